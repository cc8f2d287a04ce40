//! Submission record built from a finished form.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::core::text::width::visible_width;
use crate::form::field::{FieldKind, FormDefinition};
use crate::form::value::{FieldValue, FormResults};

const SUMMARY_WIDTH: usize = 82;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedField {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSubmission {
    pub form_id: String,
    pub form_title: String,
    pub timestamp: String,
    pub data: IndexMap<String, SubmittedField>,
}

impl FormSubmission {
    /// Stamp `results` with the local time (UTC when the offset is unknown).
    pub fn new(definition: &FormDefinition, results: &FormResults) -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::at(definition, results, now)
    }

    pub fn at(definition: &FormDefinition, results: &FormResults, when: OffsetDateTime) -> Self {
        let data = results
            .iter()
            .filter_map(|(id, value)| {
                let field = definition.field(id)?;
                Some((
                    id.to_string(),
                    SubmittedField {
                        label: field.label.clone(),
                        kind: field.kind,
                        value: value.clone(),
                    },
                ))
            })
            .collect();
        Self {
            form_id: definition.id.clone(),
            form_title: definition.title.clone(),
            timestamp: format_timestamp(when),
            data,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the record as pretty JSON, replacing any existing file.
    pub fn save_json(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Boxed, human readable rendering of the record.
    pub fn summary_rows(&self) -> Vec<String> {
        let border = "─".repeat(SUMMARY_WIDTH - 2);
        let boxed = |text: &str| {
            let pad = (SUMMARY_WIDTH - 2).saturating_sub(visible_width(text));
            format!("│{text}{}│", " ".repeat(pad))
        };

        let mut rows = vec![
            format!("┌{border}╮"),
            boxed(" ✓ Form Submission Results"),
            format!("├{border}┤"),
            boxed(&format!("  📋 {}", self.form_title)),
            boxed(&format!("  🕐 {}", self.timestamp)),
            format!("├{border}┤"),
            boxed("  Field Values"),
            format!("├{border}┤"),
        ];
        for field in self.data.values() {
            match &field.value {
                FieldValue::MultiChoice(values) => {
                    rows.push(boxed(&format!("  {}", field.label)));
                    if values.is_empty() {
                        rows.push(boxed("    (no selection)"));
                    }
                    for value in values {
                        rows.push(boxed(&format!("    ✓ {value}")));
                    }
                }
                FieldValue::Text(None) => rows.push(boxed(&format!("  {}: (empty)", field.label))),
                FieldValue::Text(Some(value)) | FieldValue::SingleChoice(value) => {
                    rows.push(boxed(&format!("  {}: {value}", field.label)));
                }
            }
        }
        rows.push(format!("└{border}╯"));
        rows
    }
}

fn format_timestamp(when: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    when.format(&format).unwrap_or_else(|_| when.unix_timestamp().to_string())
}
