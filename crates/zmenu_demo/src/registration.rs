//! Registration form command: pre-fill from a stored profile, run the form,
//! show the submission summary and optionally save it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use zmenu::{CommandDescriptor, FieldValue, Flow, Form, FormSubmission, HookTable};

/// Name the demo pretends to have on file for the current user.
pub const STORED_NAME: &str = "Kenny";

pub fn profile_hooks(stored_name: Option<String>) -> HookTable {
    HookTable::new()
        .before("name", move |_, _| Ok(stored_name.clone().map(FieldValue::text)))
        .before("plan", |_, results| {
            let corporate = results
                .text("email")
                .is_some_and(|email| email.ends_with("@example.com"));
            Ok(corporate.then(|| FieldValue::SingleChoice("team".to_string())))
        })
        .after("email", |value, field, _| {
            tracing::info!(field = %field.id, ?value, "contact address collected");
            Ok(())
        })
}

/// `<dir>/<form id>-<timestamp>.json`
pub fn submission_path(dir: &Path, submission: &FormSubmission) -> PathBuf {
    let stamp: String = submission
        .timestamp
        .chars()
        .filter_map(|ch| match ch {
            ' ' => Some('_'),
            ':' => None,
            ch => Some(ch),
        })
        .collect();
    dir.join(format!("{}-{stamp}.json", submission.form_id))
}

pub fn save_submission(dir: &Path, submission: &FormSubmission) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = submission_path(dir, submission);
    submission
        .save_json(&path)
        .with_context(|| format!("saving submission to {}", path.display()))?;
    Ok(path)
}

pub fn registration_command(form: Form, submissions: Option<PathBuf>) -> CommandDescriptor {
    let title = form.definition().title.clone();
    CommandDescriptor::new("register", title, move |console, _| {
        let mut hooks = profile_hooks(Some(STORED_NAME.to_string()));
        let results = form.run(console, &mut hooks)?;
        let submission = FormSubmission::new(form.definition(), &results);

        console.blank_line();
        for row in submission.summary_rows() {
            console.line(row);
        }
        if let Some(dir) = &submissions {
            let path = save_submission(dir, &submission)?;
            console.line(format!("💾 Saved to {}", path.display()));
        }
        Ok(Flow::Continue)
    })
    .icon("📝")
    .order(3)
    .description("Fill in a form with validation and pre-fill")
}
