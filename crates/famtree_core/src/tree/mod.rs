//! Family tree construction.
//!
//! # Responsibility
//! - Build one rooted hierarchy from flat member records.
//! - Expose the immutable arena read model consumed by views.
//!
//! # Invariants
//! - Building is pure and infallible; malformed linkage degrades silently.

pub mod builder;
pub mod node;
