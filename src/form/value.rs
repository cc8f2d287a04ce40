use indexmap::IndexMap;
use serde::Serialize;

use crate::form::field::{FieldKind, FormField};

/// A collected answer, tagged with the kind of field that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// `None` when an optional field was skipped.
    Text(Option<String>),
    SingleChoice(String),
    MultiChoice(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Some(value.into()))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::SingleChoice(_) => FieldKind::SingleChoice,
            Self::MultiChoice(_) => FieldKind::MultiChoice,
        }
    }

    /// Human readable form, using option labels where the field has them.
    pub fn display(&self, field: &FormField) -> String {
        match self {
            Self::Text(Some(text)) => text.clone(),
            Self::Text(None) => "(skipped)".to_string(),
            Self::SingleChoice(value) => field.option_label(value).to_string(),
            Self::MultiChoice(values) if values.is_empty() => "(no selection)".to_string(),
            Self::MultiChoice(values) => values
                .iter()
                .map(|value| field.option_label(value))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Answers keyed by field id, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormResults {
    values: IndexMap<String, FieldValue>,
}

impl FormResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.get(id)? {
            FieldValue::Text(text) => text.as_deref(),
            FieldValue::SingleChoice(value) => Some(value),
            FieldValue::MultiChoice(_) => None,
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, value: FieldValue) {
        self.values.insert(id.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(id, value)| (id.as_str(), value))
    }
}
