//! Terminal host for famtree.
//!
//! # Responsibility
//! - Act as gate and rendering collaborator for `famtree_core`.
//! - Map core errors to exit codes and stderr text.

use clap::{Parser, Subcommand};
use famtree_core::db::open_db;
use famtree_core::{
    init_logging, AppConfig, FamilyTree, JsonFileSource, MemberRepository, MemberSource, NodeId,
    SessionGate, SqliteMemberRepository, TreeViewController, ViewState, VisibilityState,
};
use log::warn;
use std::error::Error;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use termtree::Tree;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Browse the family tree stored in the local member store.
#[derive(Debug, Parser)]
#[command(name = "famtree", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Unlock the tree with the shared password.
    Login { password: String },
    /// Lock the tree again.
    Logout,
    /// Replace the member store content with a JSON export.
    Import { path: std::path::PathBuf },
    /// Print the tree once.
    Show {
        /// Collapse the first node with this name before printing. Repeatable.
        #[arg(long = "collapse", value_name = "NAME")]
        collapse: Vec<String>,
    },
    /// Toggle nodes interactively from stdin.
    Browse,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &AppConfig) -> CliResult<()> {
    let password = config.shared_password.clone().unwrap_or_default();
    let mut gate = SessionGate::open(&config.session_file, password)?;

    match command {
        Command::Login { password } => {
            config.require_password()?;
            gate.login(&password)?;
            println!("unlocked");
        }
        Command::Logout => {
            gate.logout()?;
            println!("locked");
        }
        Command::Import { path } => {
            let records = JsonFileSource::new(path).fetch_members()?;
            let conn = open_db(&config.db_path)?;
            let imported = SqliteMemberRepository::try_new(&conn)?.replace_all(&records)?;
            println!("imported {imported} members");
        }
        Command::Show { collapse } => {
            let conn = open_db(&config.db_path)?;
            let repo = SqliteMemberRepository::try_new(&conn)?;
            let mut controller = TreeViewController::new();
            controller.refresh(&gate, &repo);
            for name in &collapse {
                controller.click_name(name);
            }
            print_screen(&controller);
            if let ViewState::Failed { .. } = controller.state() {
                return Err("tree could not be loaded".into());
            }
        }
        Command::Browse => {
            let conn = open_db(&config.db_path)?;
            let repo = SqliteMemberRepository::try_new(&conn)?;
            browse(&gate, &repo)?;
        }
    }
    Ok(())
}

fn browse(gate: &SessionGate, source: &SqliteMemberRepository<'_>) -> CliResult<()> {
    let mut controller = TreeViewController::new();
    controller.refresh(gate, source);
    print_screen(&controller);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        let (verb, argument) = line.split_once(' ').unwrap_or((line, ""));

        match verb {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "refresh" | "expand-all" => controller.refresh(gate, source),
            "toggle" => {
                let name = argument.trim();
                let known = controller
                    .snapshot()
                    .is_some_and(|snapshot| snapshot.tree.find_by_name(name).is_some());
                if !known {
                    warn!("event=cli_toggle module=cli status=unknown_node");
                    println!("no member named `{name}`");
                    continue;
                }
                controller.click_name(name);
            }
            other => {
                println!("unknown command `{other}`; try toggle <name>, refresh, expand-all, quit");
                continue;
            }
        }
        print_screen(&controller);
    }
}

fn print_screen(controller: &TreeViewController) {
    match controller.state() {
        ViewState::Locked => {
            println!("The family tree is locked. Run `famtree login <password>` first.");
        }
        ViewState::Failed { message } => {
            println!("Something went wrong loading the family tree.");
            println!("{message}");
            println!("Type `refresh` (or re-run the command) to try again.");
        }
        ViewState::Ready(snapshot) => {
            print!("{}", render_tree(&snapshot.tree, &snapshot.expanded));
        }
    }
}

/// Builds the termtree view of the visible part of `tree`.
///
/// Rows arrive in pre-order, so an open branch is complete once a row at the
/// same or a shallower depth shows up.
fn render_tree(tree: &FamilyTree, expanded: &VisibilityState) -> Tree<String> {
    let mut open: Vec<(usize, Tree<String>)> = Vec::new();
    for row in expanded.visible_rows(tree) {
        close_branches(&mut open, row.depth);
        open.push((row.depth, Tree::new(node_label(tree, expanded, row.node))));
    }
    close_branches(&mut open, 1);

    open.pop()
        .map(|(_, root)| root)
        .unwrap_or_else(|| Tree::new(String::new()))
}

/// Attaches every open branch at `depth` or deeper to its parent.
fn close_branches(open: &mut Vec<(usize, Tree<String>)>, depth: usize) {
    while open.len() > 1 && open.last().is_some_and(|(last, _)| *last >= depth) {
        if let Some((_, finished)) = open.pop() {
            if let Some((_, parent)) = open.last_mut() {
                parent.push(finished);
            }
        }
    }
}

fn node_label(tree: &FamilyTree, expanded: &VisibilityState, id: NodeId) -> String {
    let Some(node) = tree.node(id) else {
        return String::new();
    };

    let mut label = String::new();
    if node.has_children() {
        label.push_str(if expanded.is_expanded(&node.name) {
            "▾ "
        } else {
            "▸ "
        });
    }
    label.push_str(&node.name);
    if let Some(year) = node.attributes.birth_year.as_deref() {
        label.push_str(&format!(" (b. {year})"));
    }
    if let Some((_, spouse)) = tree.spouse(id) {
        label.push_str(&format!(" ⚭ {}", spouse.name));
    }
    if node.has_children() && !expanded.is_expanded(&node.name) {
        let hidden = tree.descendants(id).len() - 1;
        label.push_str(&format!(" (+{hidden} hidden)"));
    }
    label
}
