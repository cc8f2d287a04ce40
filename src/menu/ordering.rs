//! Group relabelling and ordering table.
//!
//! Loaded by the host (usually from JSON) and consulted once while building the
//! tree. Keys are cumulative group paths such as `"Tools.Advanced"`.
//!
//! ```json
//! { "groups": { "Tools": { "icon": "🛠", "name": "Utilities", "order": 2 } } }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

/// Order given to groups absent from the table, so they trail configured ones.
pub const UNCONFIGURED_GROUP_ORDER: i64 = i64::MAX;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupStyle {
    pub icon: Option<String>,
    pub name: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupOrdering {
    pub groups: IndexMap<String, GroupStyle>,
}

impl GroupOrdering {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn style(&self, path: &str) -> Option<&GroupStyle> {
        self.groups.get(path)
    }

    pub fn order_of(&self, path: &str) -> i64 {
        self.style(path)
            .and_then(|style| style.order)
            .unwrap_or(UNCONFIGURED_GROUP_ORDER)
    }

    /// Display name: configured name, else the last path segment.
    pub fn name_of<'a>(&'a self, path: &str, segment: &'a str) -> &'a str {
        self.style(path)
            .and_then(|style| style.name.as_deref())
            .unwrap_or(segment)
    }

    pub fn icon_of(&self, path: &str) -> Option<&str> {
        self.style(path).and_then(|style| style.icon.as_deref())
    }
}
