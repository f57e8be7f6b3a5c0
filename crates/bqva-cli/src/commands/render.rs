//! Console and JSON rendering of trees and reconciliation reports

use bqva_analyzer::{AuthorizationStatus, ReconcileReport};
use bqva_core::{DependencyTree, NodeId};
use serde_json::{json, Value};
use std::fmt::Write;
use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// ANSI colouring, disabled when stdout is not a terminal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn detect() -> Self {
        Self {
            enabled: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Legend for the node colours.
pub(crate) fn format_key(palette: Palette) -> String {
    format!(
        "Key:\n{} Project\n{} Dataset\n{} Table\n{} View\n",
        palette.paint(CYAN, "◉"),
        palette.paint(YELLOW, "◉"),
        palette.paint(RED, "◉"),
        palette.paint(GREEN, "◉"),
    )
}

fn format_node(
    tree: &DependencyTree,
    id: NodeId,
    status: Option<&AuthorizationStatus>,
    palette: Palette,
) -> String {
    let object = tree.object(id);
    let reference = object.reference();
    let table_color = if object.is_view() { GREEN } else { RED };
    let mut line = format!(
        "{}:{}.{}",
        palette.paint(CYAN, reference.project.as_str()),
        palette.paint(YELLOW, reference.dataset.as_str()),
        palette.paint(table_color, reference.table.as_str()),
    );

    match status.and_then(|s| s.get(id)) {
        Some(true) => line.push_str(&format!(" {}", palette.paint(GREEN, "✓"))),
        Some(false) => line.push_str(&format!(" {}", palette.paint(RED, "⨯"))),
        None => {}
    }
    line
}

/// Draw the tree with box-drawing connectors, root first.
pub(crate) fn format_tree(
    tree: &DependencyTree,
    status: Option<&AuthorizationStatus>,
    palette: Palette,
) -> String {
    let root = tree.root();
    let mut out = format_node(tree, root, status, palette);
    out.push('\n');
    format_children(tree, root, "", status, palette, &mut out);
    out
}

fn format_children(
    tree: &DependencyTree,
    id: NodeId,
    prefix: &str,
    status: Option<&AuthorizationStatus>,
    palette: Palette,
    out: &mut String,
) {
    let children = tree.children(id);
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let connector = if last { "└── " } else { "├── " };
        let _ = writeln!(
            out,
            "{}{}{}",
            prefix,
            connector,
            format_node(tree, *child, status, palette)
        );
        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        format_children(tree, *child, &nested, status, palette, out);
    }
}

/// Nested JSON form of the tree.
pub(crate) fn tree_json(tree: &DependencyTree, status: Option<&AuthorizationStatus>) -> Value {
    node_json(tree, tree.root(), status)
}

fn node_json(tree: &DependencyTree, id: NodeId, status: Option<&AuthorizationStatus>) -> Value {
    let object = tree.object(id);
    let reference = object.reference();
    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|child| node_json(tree, *child, status))
        .collect();

    let mut node = json!({
        "project": reference.project.as_str(),
        "dataset": reference.dataset.as_str(),
        "name": reference.table.as_str(),
        "kind": object.kind().label(),
        "children": children,
    });
    if let Some(authorized) = status.and_then(|s| s.get(id)) {
        node["authorized"] = Value::Bool(authorized);
    }
    node
}

/// One line per edge plus a summary line.
pub(crate) fn format_report(report: &ReconcileReport, palette: Palette) -> String {
    let mut out = String::new();
    for edge in &report.edges {
        let label = edge.outcome.label();
        let label = if edge.outcome.is_change() {
            palette.paint(GREEN, label)
        } else {
            label.to_string()
        };
        let _ = writeln!(out, "  {} <- {}: {}", edge.child, edge.parent, label);
    }

    let verb = if report.dry_run { "would change" } else { "changed" };
    let _ = writeln!(
        out,
        "{}: {} {} of {} edge(s){}",
        report.action,
        verb,
        report.changes(),
        report.edges.len(),
        if report.dry_run { " (dry run)" } else { "" }
    );
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
