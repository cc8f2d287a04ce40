//! Option list for single and multi choice prompts.
//!
//! The list owns its highlight and selection set; [`select_one`] and
//! [`select_many`] drive it from key events and redraw only the option block.

use std::collections::BTreeSet;

use crate::core::key::{Direction, KeyEvent};
use crate::core::theme::{Role, Theme};
use crate::error::{Cancelled, InteractionError};
use crate::runtime::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMode {
    Single,
    Multi,
}

#[derive(Debug, Clone)]
pub struct ChoiceList {
    labels: Vec<String>,
    mode: ChoiceMode,
    highlighted: usize,
    selected: BTreeSet<usize>,
}

impl ChoiceList {
    pub fn new(labels: Vec<String>, mode: ChoiceMode) -> Self {
        Self {
            labels,
            mode,
            highlighted: 0,
            selected: BTreeSet::new(),
        }
    }

    /// Start with `index` highlighted. Out-of-range indices are ignored.
    pub fn with_highlighted(mut self, index: usize) -> Self {
        if index < self.labels.len() {
            self.highlighted = index;
        }
        self
    }

    /// Pre-select `indices` (multi mode only).
    pub fn with_selected(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        if self.mode == ChoiceMode::Multi {
            let len = self.labels.len();
            self.selected.extend(indices.into_iter().filter(|&i| i < len));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Selected indices in ascending order.
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn move_up(&mut self) {
        if !self.labels.is_empty() {
            self.highlighted = (self.highlighted + self.labels.len() - 1) % self.labels.len();
        }
    }

    pub fn move_down(&mut self) {
        if !self.labels.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.labels.len();
        }
    }

    /// Flip membership of the highlighted row. No-op in single mode.
    pub fn toggle(&mut self) {
        if self.mode != ChoiceMode::Multi || self.labels.is_empty() {
            return;
        }
        if !self.selected.remove(&self.highlighted) {
            self.selected.insert(self.highlighted);
        }
    }

    /// Rows occupied by [`ChoiceList::rows`].
    pub fn row_count(&self) -> usize {
        match self.mode {
            ChoiceMode::Single => self.labels.len(),
            ChoiceMode::Multi => self.labels.len() + 2,
        }
    }

    pub fn rows(&self, theme: &Theme) -> Vec<String> {
        let mut rows: Vec<String> = self
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| self.row(theme, index, label))
            .collect();
        if self.mode == ChoiceMode::Multi {
            rows.push(String::new());
            rows.push(format!("  Selected: {} items", self.selected.len()));
        }
        rows
    }

    fn row(&self, theme: &Theme, index: usize, label: &str) -> String {
        let active = index == self.highlighted;
        match self.mode {
            ChoiceMode::Single if active => {
                format!("  {}", theme.colorize(&format!("➤ {label}"), Role::Primary))
            }
            ChoiceMode::Single => format!("    {label}"),
            ChoiceMode::Multi => {
                let checkbox = if self.selected.contains(&index) {
                    "[•]"
                } else {
                    "[ ]"
                };
                let text = format!("  {checkbox} {label}");
                if active {
                    theme.colorize(&text, Role::Primary)
                } else {
                    text
                }
            }
        }
    }
}

/// Let the user pick one row. Returns the highlighted index on Enter, or
/// `None` for an empty list.
pub fn select_one(
    console: &mut Console,
    list: &mut ChoiceList,
) -> Result<Option<usize>, InteractionError> {
    run(console, list)?;
    Ok((!list.is_empty()).then_some(list.highlighted()))
}

/// Let the user toggle rows with Space. Returns the selected indices in
/// ascending order on Enter; an empty selection is allowed.
pub fn select_many(
    console: &mut Console,
    list: &mut ChoiceList,
) -> Result<Vec<usize>, InteractionError> {
    run(console, list)?;
    Ok(list.selected())
}

fn run(console: &mut Console, list: &mut ChoiceList) -> Result<(), InteractionError> {
    let mut console = console.hidden_cursor()?;
    paint(&mut console, list);

    loop {
        match console.read_key()? {
            KeyEvent::Nav(Direction::Up | Direction::Left) => list.move_up(),
            KeyEvent::Nav(Direction::Down | Direction::Right) => list.move_down(),
            KeyEvent::Space if list.mode == ChoiceMode::Multi => list.toggle(),
            KeyEvent::Enter => return Ok(()),
            KeyEvent::Escape => return Err(Cancelled::ByUser.into()),
            _ => continue,
        }
        tracing::debug!(highlighted = list.highlighted(), "choice list redraw");
        console.surface().rewind(list.row_count());
        paint(&mut console, list);
    }
}

fn paint(console: &mut Console, list: &ChoiceList) {
    for row in list.rows(console.theme()) {
        console.line(row);
    }
}
