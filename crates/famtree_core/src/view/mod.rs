//! View-state layer consumed by rendering hosts.
//!
//! # Responsibility
//! - Own expand/collapse visibility over a built tree.
//! - Drive the gate → load → render lifecycle of one tree view.

pub mod controller;
pub mod visibility;
