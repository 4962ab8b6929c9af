//! Family tree load pipeline.
//!
//! # Responsibility
//! - Run fetch → build → initialize as one load.
//! - Report load failures as one error type.
//!
//! # Invariants
//! - A load either yields a complete snapshot or an error; never a partial tree.
//! - No automatic retry; callers decide when to reload.
//! - Log lines carry counts and durations only, never member data.

use crate::source::{MemberSource, SourceError};
use crate::tree::builder::build;
use crate::tree::node::FamilyTree;
use crate::view::visibility::VisibilityState;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// One loaded tree together with its visibility state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySnapshot {
    pub tree: FamilyTree,
    pub expanded: VisibilityState,
}

/// Errors that terminate one load attempt.
#[derive(Debug)]
pub enum FamilyLoadError {
    /// Record source unreachable or returned an error.
    Source(SourceError),
}

impl Display for FamilyLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "could not load family records: {err}"),
        }
    }
}

impl Error for FamilyLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
        }
    }
}

impl From<SourceError> for FamilyLoadError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

/// Loads records from `source` and derives a fully expanded snapshot.
///
/// # Side effects
/// - Emits `family_load` events with duration and link statistics.
pub fn load_family<S: MemberSource + ?Sized>(
    source: &S,
) -> Result<FamilySnapshot, FamilyLoadError> {
    let started_at = Instant::now();
    info!("event=family_load module=service status=start");

    let records = match source.fetch_members() {
        Ok(records) => records,
        Err(err) => {
            error!(
                "event=family_load module=service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    let tree = build(&records);
    let expanded = VisibilityState::initialize(&tree);
    let stats = tree.stats();
    info!(
        "event=family_load module=service status=ok duration_ms={} records={} nodes={} fallback_root={} detached={}",
        started_at.elapsed().as_millis(),
        stats.records,
        tree.reachable_len(),
        tree.is_fallback_root(),
        stats.detached
    );

    Ok(FamilySnapshot { tree, expanded })
}
