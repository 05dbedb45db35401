//! The key/value mapping handed to every template render.

use std::{collections::BTreeMap, str::FromStr};
use tera::{Number, Value};

use crate::{error::GenerateError, warn};

pub const PROJECT_NAME: &str = "project_name";

/// A single `KEY=VALUE` option from the command line, with the value typed
/// as the most specific primitive it parses as.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOption {
    pub key: String,
    pub value: Value,
}

impl FromStr for ContextOption {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, raw) = s
            .split_once('=')
            .ok_or_else(|| GenerateError::InvalidOption(s.to_string()))?;
        let key = key.trim();

        if !is_identifier(key) {
            return Err(GenerateError::InvalidOption(s.to_string()));
        }

        Ok(ContextOption {
            key: key.to_string(),
            value: primitive(raw),
        })
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn primitive(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }

    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(raw.to_string()), Value::Number)
}

/// Built once per generation and shared, unmodified, by every render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext(BTreeMap<String, Value>);

impl RenderContext {
    /// `{ project_name } ∪ options`. Later options overwrite earlier ones
    /// with the same key; `project_name` always wins.
    #[must_use]
    pub fn new(project_name: &str, options: impl IntoIterator<Item = ContextOption>) -> Self {
        let mut map = BTreeMap::new();

        for ContextOption { key, value } in options {
            if key == PROJECT_NAME {
                warn!("Ignoring option '{PROJECT_NAME}', the project name comes from the positional argument");
                continue;
            }
            map.insert(key, value);
        }

        map.insert(PROJECT_NAME.to_string(), Value::String(project_name.to_string()));

        RenderContext(map)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.0 {
            context.insert(key.as_str(), value);
        }
        context
    }
}

impl std::fmt::Display for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ ")?;

        for (i, (k, v)) in self.0.iter().enumerate() {
            write!(f, "{k}: {v}")?;
            if i != self.0.len() - 1 {
                write!(f, ", ")?;
            }
        }

        write!(f, " }}")
    }
}
