//! Command registration values supplied by the host application.

use std::collections::BTreeMap;
use std::fmt;

use crate::runtime::Console;

/// What the navigator does after a leaf handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// Leave the enclosing menu level.
    Exit,
}

/// Positional parameters and named options handed to a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub params: Vec<String>,
    pub options: BTreeMap<String, String>,
}

impl Invocation {
    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

pub type Handler = Box<dyn FnMut(&mut Console, &Invocation) -> anyhow::Result<Flow>>;

pub struct CommandDescriptor {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub order: i64,
    /// Dot-separated group path; `None` or empty attaches to the root.
    pub group: Option<String>,
    pub description: Option<String>,
    pub invocation: Invocation,
    pub(crate) handler: Handler,
}

impl CommandDescriptor {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&mut Console, &Invocation) -> anyhow::Result<Flow> + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            order: 0,
            group: None,
            description: None,
            invocation: Invocation::default(),
            handler: Box::new(handler),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn group(mut self, path: impl Into<String>) -> Self {
        self.group = Some(path.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn invocation(mut self, invocation: Invocation) -> Self {
        self.invocation = invocation;
        self
    }

    /// Label as painted: icon prefix when present.
    pub fn display_label(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{icon} {}", self.label),
            None => self.label.clone(),
        }
    }

    pub(crate) fn invoke(&mut self, console: &mut Console) -> anyhow::Result<Flow> {
        (self.handler)(console, &self.invocation)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("order", &self.order)
            .field("group", &self.group)
            .field("description", &self.description)
            .field("invocation", &self.invocation)
            .finish_non_exhaustive()
    }
}
