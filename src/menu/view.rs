//! Painting one menu level.
//!
//! A level is a header, one row per slot, and a footer. After the first paint
//! only the rows and footer are redrawn, by rewinding exactly `slots + 1` lines.

use crate::core::theme::{Role, Theme};
use crate::menu::selection::SelectionState;
use crate::menu::tree::{MenuTree, NodeId};
use crate::runtime::Console;

const RULE_WIDTH: usize = 60;

pub const FOOTER: &str =
    "[Use Arrow Keys ↑↓ to navigate, Enter to select, type number, or ESC to go back]";

pub fn header_rows(title: &str) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    vec![
        String::new(),
        rule.clone(),
        format!("  {}", title.to_uppercase()),
        rule,
        String::new(),
    ]
}

/// Rows for every child of `node`, plus the back row when it has a parent.
pub fn list_rows(
    tree: &MenuTree,
    node: NodeId,
    state: &SelectionState,
    theme: &Theme,
) -> Vec<String> {
    let mut rows = Vec::with_capacity(state.slots());
    for (index, &child) in tree.children(node).iter().enumerate() {
        let child = tree.node(child);
        let label = format!("{}. {}", index + 1, child.label());
        rows.push(row(theme, &label, child.description(), index == state.selected()));
    }
    if let Some(parent) = tree.parent(node) {
        let index = tree.children(node).len();
        let label = format!("{}. Back to {}", index + 1, tree.title(parent));
        rows.push(row(theme, &label, None, index == state.selected()));
    }
    rows
}

fn row(theme: &Theme, label: &str, description: Option<&str>, highlighted: bool) -> String {
    if !highlighted {
        return format!("    {label}");
    }
    let description = description
        .map(|text| format!(" {}", theme.colorize(&format!("({text})"), Role::Secondary)))
        .unwrap_or_default();
    format!(
        "  {}{description}{}",
        theme.colorize(&format!("➤ {label}"), Role::Primary),
        theme.colorize(" ◄", Role::Primary)
    )
}

/// Paint the whole level: header, rows, footer.
pub fn paint_level(console: &mut Console, tree: &MenuTree, node: NodeId, state: &SelectionState) {
    for line in header_rows(tree.title(node)) {
        console.line(line);
    }
    paint_list(console, tree, node, state);
}

/// Erase the rows and footer painted last time and paint them again.
pub fn redraw_list(console: &mut Console, tree: &MenuTree, node: NodeId, state: &SelectionState) {
    tracing::debug!(node = node.raw(), selected = state.selected(), "menu redraw");
    console.surface().rewind(state.slots() + 1);
    paint_list(console, tree, node, state);
}

fn paint_list(console: &mut Console, tree: &MenuTree, node: NodeId, state: &SelectionState) {
    for line in list_rows(tree, node, state, console.theme()) {
        console.line(line);
    }
    console.line(FOOTER);
}
