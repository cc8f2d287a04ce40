//! Form definitions as deserialized from JSON.
//!
//! ```json
//! {
//!   "id": "register", "title": "Registration", "icon": "📝",
//!   "fields": [
//!     { "id": "name", "type": "text", "label": "Full Name", "required": true,
//!       "validation": { "minLength": 3 } },
//!     { "id": "plan", "type": "single_choice", "label": "Plan",
//!       "options": [ { "label": "Free", "value": "free" } ], "defaultValue": "free" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    SingleChoice,
    MultiChoice,
}

impl FieldKind {
    pub fn is_choice(self) -> bool {
        !matches!(self, Self::Text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub error_message: Option<String>,
}

/// `defaultValue`: a single string, or a list for multi choice fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    One(String),
    Many(Vec<String>),
}

impl DefaultValue {
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub default_value: Option<DefaultValue>,
}

impl FormField {
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FieldKind::Text,
            label: label.into(),
            description: String::new(),
            placeholder: String::new(),
            required: false,
            options: Vec::new(),
            validation: ValidationRules::default(),
            default_value: None,
        }
    }

    pub fn choice(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        options: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        Self {
            kind,
            options: options
                .into_iter()
                .map(|(label, value)| FieldOption {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            ..Self::text(id, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn option_index(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|option| option.value == value)
    }

    /// Label for an option value, falling back to the value itself.
    pub fn option_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.option_index(value)
            .map_or(value, |index| self.options[index].label.as_str())
    }

    /// Text default, if any.
    pub fn default_text(&self) -> Option<&str> {
        match &self.default_value {
            Some(DefaultValue::One(value)) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Option indices named by `defaultValue`, in option order.
    pub fn default_indices(&self) -> Vec<usize> {
        let Some(default) = &self.default_value else {
            return Vec::new();
        };
        let wanted = default.values();
        (0..self.options.len())
            .filter(|&index| wanted.contains(&self.options[index].value.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

impl FormDefinition {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == id)
    }
}
