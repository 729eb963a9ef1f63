//! Bot profile supplied by the caller.
//!
//! Every field has a default matching a freshly opened builder form, so a JSON
//! profile only needs to carry what the user changed. Nothing here rejects a
//! bad value: generation degrades and reports instead.

use crate::catalog::CapabilityId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_PREFIX: &str = "!";
pub const MAX_PREFIX_CHARS: usize = 3;
const FALLBACK_SLUG: &str = "discord-bot";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
    pub description: String,
    /// Command prefix, 1 to 3 characters.
    pub prefix: String,
    pub selected_capabilities: BTreeSet<CapabilityId>,
    pub theme: Theme,
    pub features: Features,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub slash_commands: bool,
    pub prefix_commands: bool,
    pub auto_moderation: bool,
    pub logging: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Cyberpunk,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            selected_capabilities: BTreeSet::new(),
            theme: Theme::default(),
            features: Features::default(),
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self {
            slash_commands: true,
            prefix_commands: false,
            auto_moderation: false,
            logging: true,
        }
    }
}

impl BotConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Add a capability id to the selection; duplicates collapse.
    pub fn with_capability(mut self, id: impl Into<CapabilityId>) -> Self {
        self.selected_capabilities.insert(id.into());
        self
    }

    pub fn prefix_is_valid(&self) -> bool {
        prefix_is_valid(&self.prefix)
    }
}

impl Features {
    /// Feature flags with their placeholder names, in a fixed order.
    pub fn flags(&self) -> [(&'static str, bool); 4] {
        [
            ("slashCommands", self.slash_commands),
            ("prefixCommands", self.prefix_commands),
            ("autoModeration", self.auto_moderation),
            ("logging", self.logging),
        ]
    }
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Cyberpunk => "cyberpunk",
        }
    }
}

/// A prefix is usable when it has 1 to 3 characters and is not all whitespace.
pub fn prefix_is_valid(prefix: &str) -> bool {
    let chars = prefix.chars().count();
    (1..=MAX_PREFIX_CHARS).contains(&chars) && !prefix.trim().is_empty()
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Directory-safe name for a bot: lowercase ASCII words joined by `-`.
pub fn project_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Read a bot profile from a JSON file.
pub fn load_config_from_path(path: &Path) -> Result<BotConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading bot config {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing bot config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_new_builder_form() {
        let config = BotConfig::default();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.features.slash_commands);
        assert!(!config.features.prefix_commands);
        assert!(!config.features.auto_moderation);
        assert!(config.features.logging);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: BotConfig = serde_json::from_value(json!({
            "name": "Sentinel",
            "selected_capabilities": ["fun", "core", "fun"],
            "features": {"auto_moderation": true},
            "theme": "cyberpunk"
        }))
        .unwrap();
        assert_eq!(config.name, "Sentinel");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.theme, Theme::Cyberpunk);
        assert!(config.features.auto_moderation);
        assert!(config.features.slash_commands);
        let ids: Vec<&str> = config
            .selected_capabilities
            .iter()
            .map(CapabilityId::as_str)
            .collect();
        assert_eq!(ids, ["core", "fun"]);
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert!(serde_json::from_value::<BotConfig>(json!({"theme": "neon"})).is_err());
    }

    #[test]
    fn prefix_length_rules() {
        assert!(prefix_is_valid("!"));
        assert!(prefix_is_valid("?b!"));
        assert!(prefix_is_valid("é"));
        assert!(!prefix_is_valid(""));
        assert!(!prefix_is_valid("   "));
        assert!(!prefix_is_valid("!!!!"));
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(project_slug("My Cool Bot!"), "my-cool-bot");
        assert_eq!(project_slug("  --Ünïcode  bot-- "), "n-code-bot");
        assert_eq!(project_slug("***"), "discord-bot");
        assert_eq!(project_slug(""), "discord-bot");
    }

    #[test]
    fn select_deduplicates() {
        let config = BotConfig::new("x").with_capability("fun").with_capability("fun").with_capability("core");
        assert_eq!(config.selected_capabilities.len(), 2);
    }
}
