//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate record source, tree builder and visibility controller into
//!   one load operation.
//! - Keep hosts decoupled from storage and build details.

pub mod family_service;
