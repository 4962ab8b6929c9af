use famtree_core::{
    load_family, JsonFileSource, MemberRecord, MemberSource, SessionError, SessionGate,
    SourceResult, TreeViewController, ViewState,
};
use std::cell::Cell;

const PASSWORD: &str = "willow";

fn family() -> Vec<MemberRecord> {
    vec![
        MemberRecord::new(1, "Root", 0),
        MemberRecord::new(2, "A", 1).with_parent(1),
        MemberRecord::new(3, "B", 2).with_parent(2),
    ]
}

fn open_gate(dir: &tempfile::TempDir) -> SessionGate {
    SessionGate::open(dir.path().join("session"), PASSWORD).unwrap()
}

fn logged_in_gate(dir: &tempfile::TempDir) -> SessionGate {
    let mut gate = open_gate(dir);
    gate.login(PASSWORD).unwrap();
    gate
}

struct CountingSource {
    records: Vec<MemberRecord>,
    fetches: Cell<usize>,
}

impl MemberSource for CountingSource {
    fn fetch_members(&self) -> SourceResult<Vec<MemberRecord>> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.records.clone())
    }
}

#[test]
fn locked_gate_never_loads() {
    let dir = tempfile::tempdir().unwrap();
    let gate = open_gate(&dir);
    let source = CountingSource {
        records: family(),
        fetches: Cell::new(0),
    };
    let mut controller = TreeViewController::new();

    controller.refresh(&gate, &source);

    assert_eq!(controller.state(), &ViewState::Locked);
    assert_eq!(source.fetches.get(), 0);
    assert!(!controller.click_name("Root"));
}

#[test]
fn refresh_loads_fully_expanded_tree() {
    let dir = tempfile::tempdir().unwrap();
    let gate = logged_in_gate(&dir);
    let mut controller = TreeViewController::new();

    controller.refresh(&gate, &family());

    let snapshot = controller.snapshot().unwrap();
    assert_eq!(snapshot.tree.root_node().name, "Root");
    assert_eq!(snapshot.expanded.len(), 3);
}

#[test]
fn clicks_toggle_and_refresh_discards_state() {
    let dir = tempfile::tempdir().unwrap();
    let gate = logged_in_gate(&dir);
    let mut controller = TreeViewController::new();
    controller.refresh(&gate, &family());

    assert!(controller.click_name("A"));
    let expanded = &controller.snapshot().unwrap().expanded;
    assert!(!expanded.is_expanded("A"));
    assert!(!expanded.is_expanded("B"));

    controller.refresh(&gate, &family());
    let expanded = &controller.snapshot().unwrap().expanded;
    assert!(expanded.is_expanded("A"));
    assert!(expanded.is_expanded("B"));
}

#[test]
fn click_on_unknown_name_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let gate = logged_in_gate(&dir);
    let mut controller = TreeViewController::new();
    controller.refresh(&gate, &family());
    let before = controller.state().clone();

    assert!(controller.click_name("Nobody"));
    assert_eq!(controller.state(), &before);
}

#[test]
fn load_failure_replaces_tree_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let gate = logged_in_gate(&dir);
    let mut controller = TreeViewController::new();
    controller.refresh(&gate, &family());

    let missing = JsonFileSource::new(dir.path().join("missing.json"));
    controller.refresh(&gate, &missing);

    match controller.state() {
        ViewState::Failed { message } => assert!(message.contains("missing.json")),
        other => panic!("expected failed state, got {other:?}"),
    }
    assert!(controller.snapshot().is_none());
    assert!(!controller.click_name("Root"));
}

#[test]
fn load_family_reports_source_error() {
    let missing = JsonFileSource::new("/nonexistent/famtree/members.json");
    let err = load_family(&missing).unwrap_err();
    assert!(err.to_string().starts_with("could not load family records"));
}

#[test]
fn session_flag_persists_until_logout() {
    let dir = tempfile::tempdir().unwrap();

    let mut gate = open_gate(&dir);
    assert!(!gate.is_authenticated());
    gate.login(" willow ").unwrap();
    assert!(gate.is_authenticated());

    let mut reopened = open_gate(&dir);
    assert!(reopened.is_authenticated());

    reopened.logout().unwrap();
    assert!(!reopened.is_authenticated());
    assert!(!reopened.flag_path().exists());
    assert!(!open_gate(&dir).is_authenticated());

    // Logging out twice is fine.
    reopened.logout().unwrap();
}

#[test]
fn wrong_password_keeps_gate_closed() {
    let dir = tempfile::tempdir().unwrap();
    let mut gate = open_gate(&dir);

    let err = gate.login("oak").unwrap_err();

    assert!(matches!(err, SessionError::InvalidPassword));
    assert!(!gate.is_authenticated());
    assert!(!gate.flag_path().exists());
}

#[test]
fn blank_shared_password_rejects_every_login() {
    let dir = tempfile::tempdir().unwrap();
    let mut gate = SessionGate::open(dir.path().join("session"), "  ").unwrap();

    assert!(matches!(
        gate.login("").unwrap_err(),
        SessionError::PasswordNotConfigured
    ));
}

#[test]
fn lock_returns_to_password_screen() {
    let dir = tempfile::tempdir().unwrap();
    let gate = logged_in_gate(&dir);
    let mut controller = TreeViewController::new();
    controller.refresh(&gate, &family());

    controller.lock();

    assert_eq!(controller.state(), &ViewState::Locked);
}
