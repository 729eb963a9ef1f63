//! Placeholder substitution for capability templates.
//!
//! A placeholder is `@@name@@` where `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
//! `@@` never appears in valid Python, Markdown or requirements files, so the
//! delimiter cannot be confused with syntax that generated source carries
//! (`{{…}}` would collide with Python's f-string brace escapes).
//!
//! Substitution is a single left-to-right pass: inserted values are never
//! rescanned, and names missing from the mapping are left in the output
//! verbatim so a file can always be produced from a partial configuration.

use crate::config::{BotConfig, non_blank};
use serde::Serialize;
use std::collections::BTreeMap;

pub const PLACEHOLDER_DELIMITER: &str = "@@";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
/// Placeholder name to replacement text.
pub struct TemplateValues(BTreeMap<String, String>);

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The mapping every capability template is rendered with.
    ///
    /// Feature flags render as Python literals `True` / `False`. A blank name,
    /// description or prefix, and a prefix outside 1 to 3 characters, is left
    /// out so its placeholder stays visible in the output.
    pub fn from_config(config: &BotConfig, dependencies: &[String]) -> Self {
        let mut values = Self::new();
        if let Some(name) = non_blank(&config.name) {
            values.insert("botName", name);
        }
        if let Some(description) = non_blank(&config.description) {
            values.insert("botDescription", description);
        }
        if config.prefix_is_valid() {
            values.insert("prefix", config.prefix.as_str());
        }
        values.insert("theme", config.theme.as_str());
        for (name, enabled) in config.features.flags() {
            values.insert(name, if enabled { "True" } else { "False" });
        }
        values.insert("requirements", dependencies.join("\n"));
        values
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rendered text plus the placeholder names that had no value.
pub struct Rendered {
    pub text: String,
    /// Unique names in order of first appearance.
    pub unresolved: Vec<String>,
}

/// Render `template`, leaving unknown placeholders untouched.
pub fn render(template: &str, values: &TemplateValues) -> String {
    render_report(template, values).text
}

/// Render `template` and report which placeholders stayed unresolved.
pub fn render_report(template: &str, values: &TemplateValues) -> Rendered {
    let mut text = String::with_capacity(template.len());
    let mut unresolved: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(PLACEHOLDER_DELIMITER) {
        text.push_str(&rest[..start]);
        let after_open = &rest[start + PLACEHOLDER_DELIMITER.len()..];
        match placeholder_name(after_open) {
            Some(name) => {
                let token_len = PLACEHOLDER_DELIMITER.len() * 2 + name.len();
                match values.get(name) {
                    Some(value) => text.push_str(value),
                    None => {
                        text.push_str(&rest[start..start + token_len]);
                        if !unresolved.iter().any(|seen| seen == name) {
                            unresolved.push(name.to_string());
                        }
                    }
                }
                rest = &rest[start + token_len..];
            }
            None => {
                // Not a placeholder; keep one '@' and rescan from the next byte.
                text.push('@');
                rest = &rest[start + 1..];
            }
        }
    }
    text.push_str(rest);

    Rendered { text, unresolved }
}

/// Placeholder names appearing in `template`, unique, in order.
pub fn placeholders(template: &str) -> Vec<String> {
    render_report(template, &TemplateValues::new()).unresolved
}

fn placeholder_name(input: &str) -> Option<&str> {
    let end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(input.len());
    let name = &input[..end];
    let first = name.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    input[end..].starts_with(PLACEHOLDER_DELIMITER).then_some(name)
}
