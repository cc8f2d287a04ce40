//! Selection cursor for one menu level.
//!
//! Arrow keys and digit shortcuts both land here, so switching between them
//! never loses state. The slot count is `child_count + has_parent`; the
//! trailing slot is the synthetic back row.

use crate::core::key::{Direction, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Child(usize),
    Back,
}

/// Outcome of feeding one key to a [`SelectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Highlight moved; repaint the list.
    Moved,
    /// A row was chosen.
    Chosen(Choice),
    /// ESC at the root.
    Cancel,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    child_count: usize,
    has_parent: bool,
    selected: usize,
}

impl SelectionState {
    pub fn new(child_count: usize, has_parent: bool) -> Self {
        Self {
            child_count,
            has_parent,
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn slots(&self) -> usize {
        self.child_count + usize::from(self.has_parent)
    }

    pub fn move_up(&mut self) {
        let slots = self.slots();
        if slots > 0 {
            self.selected = (self.selected + slots - 1) % slots;
        }
    }

    pub fn move_down(&mut self) {
        let slots = self.slots();
        if slots > 0 {
            self.selected = (self.selected + 1) % slots;
        }
    }

    /// Jump to the row labelled `digit` (1-based). Returns the choice when the
    /// digit names a row.
    pub fn select_digit(&mut self, digit: u32) -> Option<Choice> {
        let index = usize::try_from(digit).ok()?.checked_sub(1)?;
        if index >= self.slots() {
            return None;
        }
        self.selected = index;
        self.resolve()
    }

    pub fn resolve(&self) -> Option<Choice> {
        if self.selected < self.child_count {
            Some(Choice::Child(self.selected))
        } else if self.has_parent && self.selected == self.child_count {
            Some(Choice::Back)
        } else {
            None
        }
    }

    pub fn apply(&mut self, key: KeyEvent) -> SelectionAction {
        match key {
            KeyEvent::Nav(Direction::Up) => {
                self.move_up();
                SelectionAction::Moved
            }
            KeyEvent::Nav(Direction::Down) => {
                self.move_down();
                SelectionAction::Moved
            }
            KeyEvent::Digit(ch) => match ch.to_digit(10).and_then(|d| self.select_digit(d)) {
                Some(choice) => SelectionAction::Chosen(choice),
                None => SelectionAction::Ignored,
            },
            KeyEvent::Enter => match self.resolve() {
                Some(choice) => SelectionAction::Chosen(choice),
                None => SelectionAction::Ignored,
            },
            KeyEvent::Escape if self.has_parent => SelectionAction::Chosen(Choice::Back),
            KeyEvent::Escape => SelectionAction::Cancel,
            _ => SelectionAction::Ignored,
        }
    }
}
