//! Styling and control-sequence theme.
//!
//! The layout mirrors the JSON theme files hosts load:
//!
//! ```json
//! {
//!   "colors": { "primary": { "code": "\u001b[38;5;208m", "name": "orange" } },
//!   "cursor": { "hide": "\u001b[?25l", "show": "\u001b[?25h" },
//!   "cursor_movement": { "up": "\u001b[A" },
//!   "screen": { "clear_line": "\u001b[2K", "clear_to_end": "\u001b[0J" }
//! }
//! ```
//!
//! Every entry is optional. A missing entry resolves to an empty string, so the
//! operation it backs degrades to a no-op instead of failing.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::key::Direction;

/// Semantic color roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Primary,
    Secondary,
    Reset,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorEntry {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CursorCodes {
    pub hide: Option<String>,
    pub show: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovementCodes {
    pub up: Option<String>,
    pub down: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScreenCodes {
    pub clear_line: Option<String>,
    pub clear_to_end: Option<String>,
}

/// Theme injected into the terminal surface. `Theme::default()` is the plain
/// provider: no colors, no control sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: BTreeMap<String, ColorEntry>,
    pub cursor: CursorCodes,
    pub cursor_movement: MovementCodes,
    pub screen: ScreenCodes,
}

impl Theme {
    /// Plain provider for terminals without ANSI support.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Standard ANSI theme: orange primary, gray secondary.
    pub fn ansi() -> Self {
        let color = |code: &str, name: &str| ColorEntry {
            code: code.to_string(),
            name: Some(name.to_string()),
        };
        let mut colors = BTreeMap::new();
        colors.insert("primary".to_string(), color("\x1b[38;5;208m", "orange"));
        colors.insert("secondary".to_string(), color("\x1b[90m", "gray"));
        colors.insert("reset".to_string(), color("\x1b[0m", "reset"));

        Self {
            colors,
            cursor: CursorCodes {
                hide: Some("\x1b[?25l".to_string()),
                show: Some("\x1b[?25h".to_string()),
            },
            cursor_movement: MovementCodes {
                up: Some("\x1b[A".to_string()),
                down: Some("\x1b[B".to_string()),
                left: Some("\x1b[D".to_string()),
                right: Some("\x1b[C".to_string()),
            },
            screen: ScreenCodes {
                clear_line: Some("\x1b[2K".to_string()),
                clear_to_end: Some("\x1b[0J".to_string()),
            },
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn color(&self, role: Role) -> &str {
        self.colors
            .get(role.name())
            .map_or("", |entry| entry.code.as_str())
    }

    /// Wrap `text` in the role's color and a reset. Plain text when the role
    /// has no color.
    pub fn colorize(&self, text: &str, role: Role) -> String {
        let code = self.color(role);
        if code.is_empty() {
            return text.to_string();
        }
        format!("{code}{text}{}", self.color(Role::Reset))
    }

    pub fn hide_cursor(&self) -> &str {
        self.cursor.hide.as_deref().unwrap_or("")
    }

    pub fn show_cursor(&self) -> &str {
        self.cursor.show.as_deref().unwrap_or("")
    }

    pub fn clear_line(&self) -> &str {
        self.screen.clear_line.as_deref().unwrap_or("")
    }

    pub fn clear_to_end(&self) -> &str {
        self.screen.clear_to_end.as_deref().unwrap_or("")
    }

    /// Multi-line cursor movement, `CSI n <final>`, where the final byte is
    /// taken from the configured single-step code for `direction`.
    pub fn cursor_move(&self, direction: Direction, lines: usize) -> String {
        let code = match direction {
            Direction::Up => &self.cursor_movement.up,
            Direction::Down => &self.cursor_movement.down,
            Direction::Left => &self.cursor_movement.left,
            Direction::Right => &self.cursor_movement.right,
        };
        match code.as_deref().and_then(|code| code.chars().last()) {
            Some(final_byte) if lines > 0 => format!("\x1b[{lines}{final_byte}"),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Theme};
    use crate::core::key::Direction;

    #[test]
    fn ansi_theme_colorizes_with_reset() {
        let theme = Theme::ansi();
        assert_eq!(
            theme.colorize("hi", Role::Primary),
            "\x1b[38;5;208mhi\x1b[0m"
        );
    }

    #[test]
    fn plain_theme_is_all_no_ops() {
        let theme = Theme::plain();
        assert_eq!(theme.colorize("hi", Role::Primary), "hi");
        assert_eq!(theme.hide_cursor(), "");
        assert_eq!(theme.cursor_move(Direction::Up, 3), "");
        assert_eq!(theme.clear_to_end(), "");
    }

    #[test]
    fn cursor_move_uses_final_byte_of_configured_code() {
        let theme = Theme::ansi();
        assert_eq!(theme.cursor_move(Direction::Up, 4), "\x1b[4A");
        assert_eq!(theme.cursor_move(Direction::Left, 2), "\x1b[2D");
        assert_eq!(theme.cursor_move(Direction::Down, 0), "");
    }

    #[test]
    fn partial_json_degrades_missing_entries() {
        let theme = Theme::from_json(
            r#"{
                "colors": { "primary": { "code": "\u001b[35m", "name": "magenta" } },
                "cursor": { "hide": "\u001b[?25l" }
            }"#,
        )
        .expect("parse theme");

        assert_eq!(theme.colorize("x", Role::Primary), "\x1b[35mx");
        assert_eq!(theme.colorize("x", Role::Secondary), "x");
        assert_eq!(theme.hide_cursor(), "\x1b[?25l");
        assert_eq!(theme.show_cursor(), "");
        assert_eq!(theme.cursor_move(Direction::Up, 2), "");
    }
}
