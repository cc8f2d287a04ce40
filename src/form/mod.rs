//! Multi-field data entry.

pub mod engine;
pub mod field;
pub mod hooks;
pub mod submission;
pub mod validate;
pub mod value;

pub use engine::Form;
pub use field::{DefaultValue, FieldKind, FieldOption, FormDefinition, FormField, ValidationRules};
pub use hooks::{FormHooks, HookTable, NoHooks};
pub use submission::{FormSubmission, SubmittedField};
pub use value::{FieldValue, FormResults};
