//! Controlling view for one family tree screen.
//!
//! # Responsibility
//! - Own exactly one tree and visibility state at a time.
//! - Apply gate, load and click events as state transitions.
//!
//! # Invariants
//! - Nothing loads while the gate is closed.
//! - Every refresh discards the previous tree and visibility state.
//! - A failed load shows only the error; no partial tree survives it.
//! - Clicks are ignored unless a tree is shown.

use crate::service::family_service::{load_family, FamilySnapshot};
use crate::session::SessionGate;
use crate::source::MemberSource;
use crate::tree::node::NodeId;
use log::debug;

/// What the screen currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Gate closed; the password screen is shown.
    Locked,
    /// Tree loaded.
    Ready(FamilySnapshot),
    /// Last load failed; shown as a full-screen error until a manual refresh.
    Failed { message: String },
}

/// Single owner of the tree view state.
#[derive(Debug)]
pub struct TreeViewController {
    state: ViewState,
}

impl Default for TreeViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeViewController {
    /// Creates a locked controller.
    pub fn new() -> Self {
        Self {
            state: ViewState::Locked,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the loaded snapshot, if any.
    pub fn snapshot(&self) -> Option<&FamilySnapshot> {
        match &self.state {
            ViewState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Re-runs the full gate → load → build → initialize sequence.
    pub fn refresh<S: MemberSource + ?Sized>(&mut self, gate: &SessionGate, source: &S) {
        if !gate.is_authenticated() {
            self.state = ViewState::Locked;
            return;
        }

        self.state = match load_family(source) {
            Ok(snapshot) => ViewState::Ready(snapshot),
            Err(err) => ViewState::Failed {
                message: err.to_string(),
            },
        };
    }

    /// Applies a click on `node`. Returns whether a tree was shown.
    pub fn click(&mut self, node: NodeId) -> bool {
        let ViewState::Ready(snapshot) = &mut self.state else {
            debug!("event=view_click module=view status=ignored");
            return false;
        };
        snapshot.expanded = snapshot.expanded.toggle(&snapshot.tree, node);
        true
    }

    /// Applies a click on the first node named `name`.
    pub fn click_name(&mut self, name: &str) -> bool {
        let node = match &self.state {
            ViewState::Ready(snapshot) => snapshot.tree.find_by_name(name),
            _ => None,
        };
        match node {
            Some(node) => self.click(node),
            None => matches!(self.state, ViewState::Ready(_)),
        }
    }

    /// Drops every loaded state back to the password screen.
    pub fn lock(&mut self) {
        self.state = ViewState::Locked;
    }
}
