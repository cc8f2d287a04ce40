//! Pre-fill and post-collection hooks.
//!
//! Hook errors never abort a form: the engine reports them and carries on as
//! if the hook had offered nothing.

use std::collections::HashMap;

use crate::form::field::FormField;
use crate::form::value::{FieldValue, FormResults};

pub trait FormHooks {
    /// Offer a value for `field` before it is prompted. `results` holds the
    /// answers to earlier fields.
    fn before_input(
        &mut self,
        _field: &FormField,
        _results: &FormResults,
    ) -> anyhow::Result<Option<FieldValue>> {
        Ok(None)
    }

    /// Observe a committed value. `results` holds the answers to earlier
    /// fields.
    fn after_input(
        &mut self,
        _value: &FieldValue,
        _field: &FormField,
        _results: &FormResults,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl FormHooks for NoHooks {}

type BeforeHook = Box<dyn FnMut(&FormField, &FormResults) -> anyhow::Result<Option<FieldValue>>>;
type AfterHook = Box<dyn FnMut(&FieldValue, &FormField, &FormResults) -> anyhow::Result<()>>;

/// Hooks registered per field id.
#[derive(Default)]
pub struct HookTable {
    before: HashMap<String, BeforeHook>,
    after: HashMap<String, AfterHook>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<F>(mut self, field: impl Into<String>, hook: F) -> Self
    where
        F: FnMut(&FormField, &FormResults) -> anyhow::Result<Option<FieldValue>> + 'static,
    {
        self.before.insert(field.into(), Box::new(hook));
        self
    }

    pub fn after<F>(mut self, field: impl Into<String>, hook: F) -> Self
    where
        F: FnMut(&FieldValue, &FormField, &FormResults) -> anyhow::Result<()> + 'static,
    {
        self.after.insert(field.into(), Box::new(hook));
        self
    }
}

impl FormHooks for HookTable {
    fn before_input(
        &mut self,
        field: &FormField,
        results: &FormResults,
    ) -> anyhow::Result<Option<FieldValue>> {
        match self.before.get_mut(&field.id) {
            Some(hook) => hook(field, results),
            None => Ok(None),
        }
    }

    fn after_input(
        &mut self,
        value: &FieldValue,
        field: &FormField,
        results: &FormResults,
    ) -> anyhow::Result<()> {
        match self.after.get_mut(&field.id) {
            Some(hook) => hook(value, field, results),
            None => Ok(()),
        }
    }
}
