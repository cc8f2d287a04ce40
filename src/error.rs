//! Error taxonomy shared by the decoder, menus, and forms.

use thiserror::Error;

/// Why an interactive loop was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Cancelled {
    /// Interrupt byte (Ctrl-C) or ESC at the outermost level.
    #[error("cancelled by user")]
    ByUser,
    /// SIGINT/SIGTERM delivered to the process.
    #[error("cancelled by signal")]
    BySignal,
}

/// Failure of any operation that talks to the terminal.
///
/// `Cancelled` unwinds through every nested loop with `?`; scoped guards restore
/// raw mode and cursor visibility on the way out.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("terminal I/O error while {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl InteractionError {
    #[must_use]
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn cancelled(&self) -> Option<Cancelled> {
        match self {
            Self::Cancelled(reason) => Some(*reason),
            Self::Io { .. } => None,
        }
    }
}

/// Problems found while merging descriptors into a menu tree. The offending
/// descriptor is skipped; the rest of the tree is still built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("duplicate command id '{id}' in group '{parent}'")]
    DuplicateId { parent: String, id: String },

    #[error("command '{id}' has malformed group path '{path}'")]
    MalformedGroupPath { id: String, path: String },
}

/// A rejected text value. The message is shown under the input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,

    #[error("Minimum length is {min} characters")]
    TooShort { min: usize },

    #[error("Maximum length is {max} characters")]
    TooLong { max: usize },

    #[error("{message}")]
    Pattern { message: String },
}

/// A form definition that cannot be run.
#[derive(Debug, Error)]
pub enum FormDefinitionError {
    #[error("field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("choice field '{field}' has no options")]
    MissingOptions { field: String },

    #[error("duplicate field id '{field}'")]
    DuplicateFieldId { field: String },
}
