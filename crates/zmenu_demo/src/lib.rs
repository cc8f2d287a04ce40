//! Demo host for `zmenu`: a command catalog, data file loaders and a
//! registration form wired into one menu session.

pub mod actions;
pub mod loaders;
pub mod registration;

use zmenu::{CommandDescriptor, Form, StructuralError};

use crate::loaders::DemoPaths;

pub const APP_TITLE: &str = "ZMenu Demo App";

/// Every command the demo registers, in no particular order; the tree builder
/// sorts them.
pub fn catalog(form: Form, paths: &DemoPaths) -> Vec<CommandDescriptor> {
    let mut commands = vec![
        actions::hello(),
        actions::greeting(),
        registration::registration_command(form, paths.submissions.clone()),
        actions::calculator(),
        actions::system_info(),
        actions::about(),
        actions::quit(),
    ];
    commands.extend(actions::script_commands());
    commands
}

/// One line per descriptor the tree builder had to leave out, for printing
/// before the session takes over the terminal.
pub fn skipped_report(errors: &[StructuralError]) -> Vec<String> {
    errors
        .iter()
        .map(|err| format!("skipped command: {err}"))
        .collect()
}
