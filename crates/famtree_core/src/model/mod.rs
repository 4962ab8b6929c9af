//! Input data model for family records.
//!
//! # Responsibility
//! - Define the flat record shape supplied by record sources.
//!
//! # Invariants
//! - Records are immutable inputs; derived structure lives in `tree`.

pub mod member;
