//! Repository layer over the SQLite member store.
//!
//! # Responsibility
//! - Define member data access contracts.
//! - Isolate SQLite query details from the load pipeline.
//!
//! # Invariants
//! - Repository writes enforce `MemberRecord::validate()` before persistence.

pub mod member_repo;
