//! Text field validation.

use regex::Regex;

use crate::error::{FormDefinitionError, ValidationError};
use crate::form::field::FormField;

const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";

/// A field's rules with the pattern compiled once, when the form is prepared.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    message: String,
}

impl CompiledRules {
    /// The pattern must match at the start of the value, not necessarily the
    /// whole of it.
    pub fn compile(field: &FormField) -> Result<Self, FormDefinitionError> {
        let rules = &field.validation;
        let pattern = rules
            .pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                    FormDefinitionError::InvalidPattern {
                        field: field.id.clone(),
                        source,
                    }
                })
            })
            .transpose()?;
        Ok(Self {
            required: field.required,
            min_length: rules.min_length,
            max_length: rules.max_length,
            pattern,
            message: rules
                .error_message
                .clone()
                .unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string()),
        })
    }

    /// Check one trimmed value. An empty value only fails when required;
    /// length counts characters.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return if self.required {
                Err(ValidationError::Required)
            } else {
                Ok(())
            };
        }
        let length = value.chars().count();
        if let Some(min) = self.min_length.filter(|&min| length < min) {
            return Err(ValidationError::TooShort { min });
        }
        if let Some(max) = self.max_length.filter(|&max| length > max) {
            return Err(ValidationError::TooLong { max });
        }
        match &self.pattern {
            Some(pattern) if !pattern.is_match(value) => Err(ValidationError::Pattern {
                message: self.message.clone(),
            }),
            _ => Ok(()),
        }
    }
}
