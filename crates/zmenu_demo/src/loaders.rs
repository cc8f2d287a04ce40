//! JSON data files the demo reads at startup.
//!
//! Each loader falls back to a built-in default when no path is configured.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use zmenu::{Form, FormDefinition, GroupOrdering, Theme};

const BUILTIN_FORM: &str = include_str!("../forms/registration.json");

const BUILTIN_ORDERING: &str = r#"{
  "groups": {
    "Tools": { "icon": "🛠", "order": 10 },
    "Scripts": { "icon": "📜", "name": "Script Launcher", "order": 20 },
    "Scripts.build": { "icon": "🏗", "name": "Build & Release", "order": 1 },
    "Scripts.test": { "icon": "🧪", "name": "Testing", "order": 2 },
    "Scripts.maint": { "icon": "🧹", "name": "Maintenance", "order": 3 }
  }
}"#;

/// Data file locations, read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoPaths {
    /// `ZMENU_THEME_FILE`
    pub theme: Option<PathBuf>,
    /// `ZMENU_ORDERING_FILE`
    pub ordering: Option<PathBuf>,
    /// `ZMENU_FORM_FILE`
    pub form: Option<PathBuf>,
    /// `ZMENU_SUBMISSION_DIR`: where finished registrations are saved.
    pub submissions: Option<PathBuf>,
}

impl DemoPaths {
    pub fn from_env() -> Self {
        Self {
            theme: env_path("ZMENU_THEME_FILE"),
            ordering: env_path("ZMENU_ORDERING_FILE"),
            form: env_path("ZMENU_FORM_FILE"),
            submissions: env_path("ZMENU_SUBMISSION_DIR"),
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_theme(path: Option<&Path>) -> anyhow::Result<Theme> {
    let Some(path) = path else {
        return Ok(Theme::ansi());
    };
    Theme::from_json(&read(path)?).with_context(|| format!("parsing theme {}", path.display()))
}

pub fn load_ordering(path: Option<&Path>) -> anyhow::Result<GroupOrdering> {
    match path {
        Some(path) => GroupOrdering::from_json(&read(path)?)
            .with_context(|| format!("parsing group ordering {}", path.display())),
        None => GroupOrdering::from_json(BUILTIN_ORDERING).context("parsing built-in ordering"),
    }
}

/// Form files may hold the definition itself or wrap it as `{"form": {...}}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormFile {
    Wrapped { form: FormDefinition },
    Bare(FormDefinition),
}

pub fn parse_form(json: &str) -> anyhow::Result<Form> {
    let definition = match serde_json::from_str::<FormFile>(json)? {
        FormFile::Wrapped { form } => form,
        FormFile::Bare(form) => form,
    };
    Ok(Form::new(definition)?)
}

pub fn load_form(path: Option<&Path>) -> anyhow::Result<Form> {
    match path {
        Some(path) => {
            parse_form(&read(path)?).with_context(|| format!("loading form {}", path.display()))
        }
        None => parse_form(BUILTIN_FORM).context("loading built-in form"),
    }
}
