//! Keyboard-driven console menus and forms.
//!
//! Invariant: single output gate. Only `core::output::OutputGate::flush(..)`
//! writes to the terminal, and every interactive loop reaches it through
//! [`Console`].
//!
//! # Public API Overview
//! - Register [`CommandDescriptor`]s, merge them into a tree with [`build`],
//!   and drive it with [`MenuSession::run`].
//! - Describe a form with [`FormDefinition`], prepare it with [`Form::new`],
//!   and collect answers with [`Form::run`].
//! - Decode keys with [`KeyDecoder`] over any [`Terminal`]; the process
//!   terminal lives in [`platform`].
//! - Style output through an injected [`Theme`].

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod form;
pub mod menu;
pub mod platform;
pub mod render;
pub mod runtime;
pub mod widgets;

/// Environment configuration.
pub use crate::config::EnvConfig;

/// Error taxonomy.
pub use crate::error::{
    Cancelled, FormDefinitionError, InteractionError, StructuralError, ValidationError,
};

/// Keys, terminals and styling.
pub use crate::core::key::{Direction, KeyDecoder, KeyEvent};
pub use crate::core::terminal::{ByteRead, InputFlavor, RawModeGuard, Terminal};
pub use crate::core::theme::{Role, Theme};
pub use crate::platform::ProcessTerminal;

/// Console handle passed to handlers and forms.
pub use crate::render::Surface;
pub use crate::runtime::{Console, CursorGuard};

/// Menus.
pub use crate::menu::{
    build, CommandDescriptor, Flow, GroupOrdering, Invocation, MenuSession, MenuTree,
    SessionOutcome, TreeBuild,
};

/// Forms.
pub use crate::form::{
    FieldKind, FieldValue, Form, FormDefinition, FormField, FormHooks, FormResults,
    FormSubmission, HookTable, NoHooks,
};

/// Prompts usable from handlers.
pub use crate::widgets::{confirm_two_way, read_line, wait_for_enter};

/// ANSI-aware truncation helper.
pub use crate::core::text::utils::truncate_to_width;
/// Visible width helper that ignores ANSI control sequences.
pub use crate::core::text::width::visible_width;
