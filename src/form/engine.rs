//! Sequential field collection.
//!
//! Fields are asked one at a time. Every row a field prints is counted in its
//! [`Footprint`]; once the answer is committed the footprint is rewound and
//! replaced by a single `[i/N] label: value` line. Hook failures are printed
//! outside the footprint so they stay on screen.

use std::collections::HashSet;

use crate::error::{FormDefinitionError, InteractionError};
use crate::form::field::{FieldKind, FormDefinition, FormField};
use crate::form::hooks::FormHooks;
use crate::form::validate::CompiledRules;
use crate::form::value::{FieldValue, FormResults};
use crate::runtime::Console;
use crate::widgets::choice_list::{select_many, select_one, ChoiceList, ChoiceMode};
use crate::widgets::confirm::{confirm_two_way, CONFIRM_ROWS};
use crate::widgets::line_input::read_line_counted;

const RULE_WIDTH: usize = 60;
const DEFAULT_ICON: &str = "📝";
const INPUT_PROMPT: &str = "➤ ";

/// A validated form definition, ready to run any number of times.
#[derive(Debug, Clone)]
pub struct Form {
    definition: FormDefinition,
    rules: Vec<CompiledRules>,
}

impl Form {
    /// Reject definitions that cannot be run: duplicate ids, choice fields
    /// without options, and patterns that do not compile.
    pub fn new(definition: FormDefinition) -> Result<Self, FormDefinitionError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(definition.fields.len());
        for field in &definition.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(FormDefinitionError::DuplicateFieldId {
                    field: field.id.clone(),
                });
            }
            if field.kind.is_choice() && field.options.is_empty() {
                return Err(FormDefinitionError::MissingOptions {
                    field: field.id.clone(),
                });
            }
            rules.push(CompiledRules::compile(field)?);
        }
        Ok(Self { definition, rules })
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// Collect every field in order. Cancellation anywhere aborts the whole
    /// form and discards what was collected so far.
    pub fn run(
        &self,
        console: &mut Console,
        hooks: &mut dyn FormHooks,
    ) -> Result<FormResults, InteractionError> {
        tracing::info!(form = %self.definition.id, "form started");
        self.paint_banner(console);

        let total = self.definition.fields.len();
        let mut results = FormResults::new();
        for (index, (field, rules)) in self.definition.fields.iter().zip(&self.rules).enumerate() {
            let step = Step {
                number: index + 1,
                total,
                field,
            };
            let suggestion = suggestion(console, hooks, field, &results);
            let value = match field.kind {
                FieldKind::Text => collect_text(console, &step, rules, suggestion)?,
                FieldKind::SingleChoice => collect_single(console, &step, suggestion)?,
                FieldKind::MultiChoice => collect_multi(console, &step, suggestion)?,
            };
            tracing::debug!(field = %field.id, ?value, "field committed");

            if let Err(err) = hooks.after_input(&value, field, &results) {
                tracing::warn!(field = %field.id, error = %format!("{err:#}"), "post-collection hook failed");
                console.line(format!("❌ Error processing field '{}': {err}", field.id));
            }
            results.insert(field.id.clone(), value);
        }

        console.flush()?;
        tracing::info!(form = %self.definition.id, fields = results.len(), "form completed");
        Ok(results)
    }

    fn paint_banner(&self, console: &mut Console) {
        let definition = &self.definition;
        let rule = "=".repeat(RULE_WIDTH);
        let icon = definition.icon.as_deref().unwrap_or(DEFAULT_ICON);
        console.blank_line();
        console.line(&rule);
        console.line(format!("  {icon} {}", definition.title));
        console.line(&rule);
        if let Some(description) = definition.description.as_deref().filter(|d| !d.is_empty()) {
            console.blank_line();
            console.line(description);
            console.blank_line();
        }
    }
}

struct Step<'a> {
    number: usize,
    total: usize,
    field: &'a FormField,
}

impl Step<'_> {
    fn title(&self) -> String {
        format!("[{}/{}] {}", self.number, self.total, self.field.label)
    }

    fn summary(&self, value: &FieldValue) -> String {
        format!("{}: {}", self.title(), value.display(self.field))
    }
}

/// Rows printed for the field currently being asked.
#[derive(Debug, Default)]
struct Footprint {
    rows: usize,
}

impl Footprint {
    /// Blank separator, the step title and the description.
    fn header(console: &mut Console, step: &Step<'_>) -> Self {
        let mut footprint = Self::default();
        footprint.blank(console);
        footprint.line(console, step.title());
        if !step.field.description.is_empty() {
            footprint.line(console, format!("    {}", step.field.description));
        }
        footprint
    }

    fn line(&mut self, console: &mut Console, text: impl AsRef<str>) {
        console.line(text);
        self.rows += 1;
    }

    fn blank(&mut self, console: &mut Console) {
        console.blank_line();
        self.rows += 1;
    }

    fn collapse(self, console: &mut Console, summary: String) {
        console.surface().rewind(self.rows);
        console.line(summary);
    }
}

/// Ask the pre-fill hook for a value that fits `field`. Errors and values of
/// the wrong shape count as no suggestion.
fn suggestion(
    console: &mut Console,
    hooks: &mut dyn FormHooks,
    field: &FormField,
    results: &FormResults,
) -> Option<FieldValue> {
    match hooks.before_input(field, results) {
        Ok(Some(value)) => {
            let fitted = fit_suggestion(field, value);
            if fitted.is_none() {
                tracing::warn!(field = %field.id, "pre-fill value does not fit the field; ignored");
            }
            fitted
        }
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(field = %field.id, error = %format!("{err:#}"), "pre-fill hook failed");
            console.line(format!("❌ Error in pre-fill hook for field '{}': {err}", field.id));
            None
        }
    }
}

fn fit_suggestion(field: &FormField, value: FieldValue) -> Option<FieldValue> {
    match (field.kind, value) {
        (FieldKind::Text, FieldValue::Text(Some(text)) | FieldValue::SingleChoice(text)) => {
            Some(FieldValue::Text(Some(text)))
        }
        (FieldKind::SingleChoice, FieldValue::SingleChoice(value) | FieldValue::Text(Some(value)))
            if field.option_index(&value).is_some() =>
        {
            Some(FieldValue::SingleChoice(value))
        }
        (FieldKind::MultiChoice, FieldValue::MultiChoice(values)) => {
            let picked: Vec<String> = field
                .options
                .iter()
                .filter(|option| values.contains(&option.value))
                .map(|option| option.value.clone())
                .collect();
            (!picked.is_empty()).then_some(FieldValue::MultiChoice(picked))
        }
        _ => None,
    }
}

/// Show the suggestion and ask whether to keep it.
fn offer(
    console: &mut Console,
    footprint: &mut Footprint,
    step: &Step<'_>,
    value: &FieldValue,
) -> Result<bool, InteractionError> {
    let shown = value.display(step.field);
    footprint.line(console, format!("    (preset: {shown})"));
    let accepted = confirm_two_way(console, &format!("Use existing value: {shown}?"), "YES", "NO")?;
    footprint.rows += CONFIRM_ROWS;
    Ok(accepted)
}

fn collect_text(
    console: &mut Console,
    step: &Step<'_>,
    rules: &CompiledRules,
    suggestion: Option<FieldValue>,
) -> Result<FieldValue, InteractionError> {
    let field = step.field;
    let mut footprint = Footprint::header(console, step);
    if !field.placeholder.is_empty() {
        footprint.line(console, format!("    (e.g.: {})", field.placeholder));
    }
    if !field.required {
        footprint.line(console, "    (optional, press ENTER to skip)");
    }
    if let Some(default) = field.default_text() {
        footprint.line(console, format!("    (default: {default})"));
    }
    if let Some(value) = suggestion {
        if offer(console, &mut footprint, step, &value)? {
            footprint.collapse(console, step.summary(&value));
            return Ok(value);
        }
    }

    // The last error line stays above the prompt until the next attempt.
    let mut error_rows = 0;
    loop {
        let input = read_line_counted(console, INPUT_PROMPT)?;
        let text = if input.text.is_empty() {
            field.default_text().unwrap_or_default().to_string()
        } else {
            input.text
        };
        match rules.check(&text) {
            Ok(()) => {
                footprint.rows += error_rows + input.rows;
                let value = FieldValue::Text((!text.is_empty()).then_some(text));
                footprint.collapse(console, step.summary(&value));
                return Ok(value);
            }
            Err(err) => {
                tracing::warn!(field = %field.id, error = %err, "validation failed");
                console.surface().rewind(error_rows + input.rows);
                console.line(format!("❌ {err}"));
                error_rows = 1;
            }
        }
    }
}

fn choice_labels(field: &FormField) -> Vec<String> {
    field.options.iter().map(|option| option.label.clone()).collect()
}

fn collect_single(
    console: &mut Console,
    step: &Step<'_>,
    suggestion: Option<FieldValue>,
) -> Result<FieldValue, InteractionError> {
    let field = step.field;
    let mut footprint = Footprint::header(console, step);
    footprint.line(console, "    (Use ↑↓ to select, ENTER to confirm)");
    if let Some(value) = suggestion {
        if offer(console, &mut footprint, step, &value)? {
            footprint.collapse(console, step.summary(&value));
            return Ok(value);
        }
    }

    footprint.blank(console);
    let start = field.default_indices().first().copied().unwrap_or(0);
    let mut list = ChoiceList::new(choice_labels(field), ChoiceMode::Single).with_highlighted(start);
    let chosen = select_one(console, &mut list)?;
    footprint.rows += list.row_count();

    let value = FieldValue::SingleChoice(
        chosen
            .and_then(|index| field.options.get(index))
            .map(|option| option.value.clone())
            .unwrap_or_default(),
    );
    footprint.collapse(console, step.summary(&value));
    Ok(value)
}

fn collect_multi(
    console: &mut Console,
    step: &Step<'_>,
    suggestion: Option<FieldValue>,
) -> Result<FieldValue, InteractionError> {
    let field = step.field;
    let mut footprint = Footprint::header(console, step);
    footprint.line(console, "    (Use ↑↓ to navigate, SPACE to toggle, ENTER to confirm)");
    if let Some(value) = suggestion {
        if offer(console, &mut footprint, step, &value)? {
            footprint.collapse(console, step.summary(&value));
            return Ok(value);
        }
    }

    footprint.blank(console);
    let mut list =
        ChoiceList::new(choice_labels(field), ChoiceMode::Multi).with_selected(field.default_indices());
    let chosen = select_many(console, &mut list)?;
    footprint.rows += list.row_count();

    let value = FieldValue::MultiChoice(
        chosen
            .into_iter()
            .filter_map(|index| field.options.get(index))
            .map(|option| option.value.clone())
            .collect(),
    );
    footprint.collapse(console, step.summary(&value));
    Ok(value)
}
