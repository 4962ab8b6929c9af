//! Core logic for famtree: turning flat family records into a collapsible tree.
//! This crate owns tree construction and view-state invariants; hosts only render.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod source;
pub mod tree;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::member::{MemberId, MemberRecord, MemberValidationError};
pub use repo::member_repo::{MemberRepository, RepoError, RepoResult, SqliteMemberRepository};
pub use service::family_service::{load_family, FamilyLoadError, FamilySnapshot};
pub use session::{SessionError, SessionGate};
pub use source::{JsonFileSource, MemberSource, SourceError, SourceResult};
pub use tree::builder::build;
pub use tree::node::{
    BuildStats, FamilyTree, MemberAttributes, NodeId, TreeNode, FALLBACK_ROOT_NAME,
};
pub use view::controller::{TreeViewController, ViewState};
pub use view::visibility::{VisibilityState, VisibleRow};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
