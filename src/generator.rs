//! Turn a bot profile and a capability catalog into a generated project.
//!
//! Generation is a pure function of its inputs: no I/O, no clock, no
//! randomness, no logging. The only fatal condition is a malformed catalog;
//! everything else becomes a [`Diagnostic`] on the returned [`Generation`].

use crate::aggregate::{Contribution, aggregate, normalize_path};
use crate::bundle::{GeneratedBot, GeneratedFile, Generation};
use crate::catalog::{Capability, CapabilityId, CapabilityIndex};
use crate::config::{BotConfig, Features, non_blank};
use crate::diagnostics::Diagnostic;
use crate::error::GenerateError;
use crate::render::{TemplateValues, render_report};
use std::collections::BTreeSet;

/// Packages every generated bot imports.
pub const BASELINE_DEPENDENCIES: &[&str] = &["discord.py", "python-dotenv"];

/// Generate against a capability slice, validating it first.
pub fn generate(config: BotConfig, catalog: &[Capability]) -> Result<Generation, GenerateError> {
    let index = CapabilityIndex::from_capabilities(catalog.to_vec())?;
    Ok(generate_with_index(config, &index))
}

/// Generate against an already validated catalog.
pub fn generate_with_index(config: BotConfig, index: &CapabilityIndex) -> Generation {
    let mut diagnostics = config_diagnostics(&config);
    let mut config = config;

    let (known, unknown): (BTreeSet<CapabilityId>, BTreeSet<CapabilityId>) = config
        .selected_capabilities
        .iter()
        .cloned()
        .partition(|id| index.contains(id));
    diagnostics.extend(
        unknown
            .into_iter()
            .map(|id| Diagnostic::UnknownCapability { id }),
    );
    config.selected_capabilities = known;

    let selected: Vec<&Capability> = index
        .list()
        .iter()
        .filter(|cap| config.selected_capabilities.contains(&cap.id))
        .collect();

    let dependencies = resolve_dependencies(&config.features, selected.iter().copied());
    let values = TemplateValues::from_config(&config, &dependencies);

    let mut contributions = Vec::with_capacity(selected.len());
    for cap in &selected {
        let (contribution, unresolved) = render_capability(cap, &values);
        diagnostics.extend(unresolved);
        contributions.push(contribution);
    }

    let aggregation = aggregate(contributions);
    diagnostics.extend(
        aggregation
            .collisions
            .into_iter()
            .map(|collision| Diagnostic::PathCollision {
                path: collision.path,
                previous: collision.previous,
                replaced_by: collision.replaced_by,
            }),
    );

    let setup_instructions = setup_instructions(&config, &dependencies, &aggregation.files);
    Generation {
        bot: GeneratedBot {
            config,
            files: aggregation.files,
            dependencies,
            setup_instructions,
        },
        diagnostics,
    }
}

fn render_capability(cap: &Capability, values: &TemplateValues) -> (Contribution, Vec<Diagnostic>) {
    let values = values
        .clone()
        .with("capabilityId", cap.id.as_str())
        .with("capabilityTitle", cap.title.as_str());

    let mut files = Vec::with_capacity(cap.files.len());
    let mut unresolved = Vec::new();
    for file in &cap.files {
        let rendered = render_report(&file.template, &values);
        let path = normalize_path(&file.target_path);
        unresolved.extend(rendered.unresolved.into_iter().map(|name| {
            Diagnostic::UnresolvedPlaceholder {
                capability: cap.id.clone(),
                path: path.clone(),
                name,
            }
        }));
        files.push(GeneratedFile {
            path,
            content: rendered.text,
        });
    }

    (
        Contribution {
            capability: cap.id.clone(),
            files,
        },
        unresolved,
    )
}

/// Baseline packages, feature packages and capability hints, merged.
///
/// Names are trimmed and lowercased before deduplication; the result is
/// sorted.
pub fn resolve_dependencies<'a, I>(features: &Features, capabilities: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Capability>,
{
    let mut resolved = BTreeSet::new();
    for name in BASELINE_DEPENDENCIES {
        insert_dependency(&mut resolved, name);
    }
    for name in feature_dependencies(features) {
        insert_dependency(&mut resolved, name);
    }
    for cap in capabilities {
        for name in &cap.dependencies {
            insert_dependency(&mut resolved, name);
        }
    }
    resolved.into_iter().collect()
}

fn feature_dependencies(features: &Features) -> Vec<&'static str> {
    let mut packages = Vec::new();
    if features.logging {
        packages.push("colorlog");
    }
    if features.auto_moderation {
        packages.push("better-profanity");
    }
    packages
}

fn insert_dependency(resolved: &mut BTreeSet<String>, name: &str) {
    let name = name.trim();
    if !name.is_empty() {
        resolved.insert(name.to_lowercase());
    }
}

/// Fixed-format setup text derived from the profile and the generated files.
///
/// Steps only name `requirements.txt`, `.env.example` and `main.py` when those
/// files are part of `files`.
pub fn setup_instructions(
    config: &BotConfig,
    dependencies: &[String],
    files: &[GeneratedFile],
) -> String {
    let name = non_blank(&config.name).unwrap_or("your bot");
    let generated = |path: &str| files.iter().any(|file| file.path == path);

    let install = if generated("requirements.txt") {
        "   pip install -r requirements.txt".to_string()
    } else {
        format!("   pip install {}", dependencies.join(" "))
    };
    let token = if generated(".env.example") {
        "   cp .env.example .env, then set DISCORD_TOKEN"
    } else {
        "   create a .env file containing DISCORD_TOKEN=<your token>"
    };
    let run = if generated("main.py") {
        "   python main.py"
    } else {
        "   python main.py (no main.py was generated; select a capability that provides it)"
    };

    let mut lines = vec![
        format!("Setup instructions for {name}"),
        String::new(),
        "1. Install dependencies:".to_string(),
        install,
        "2. Configure your bot token:".to_string(),
        token.to_string(),
        "3. Run your bot:".to_string(),
        run.to_string(),
        String::new(),
        format!("Dependencies: {}", dependencies.join(", ")),
    ];

    if config.selected_capabilities.is_empty() {
        lines.push("Capabilities: none selected".to_string());
    } else {
        let ids: Vec<&str> = config
            .selected_capabilities
            .iter()
            .map(CapabilityId::as_str)
            .collect();
        lines.push(format!("Capabilities: {}", ids.join(", ")));
    }

    let notes = feature_notes(config);
    if notes.is_empty() {
        lines.push("Enabled features: none".to_string());
    } else {
        lines.push("Enabled features:".to_string());
        lines.extend(notes.into_iter().map(|note| format!("- {note}")));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn feature_notes(config: &BotConfig) -> Vec<String> {
    let features = &config.features;
    let mut notes = Vec::new();
    if features.slash_commands {
        notes.push("Slash commands are synced when the bot starts; allow up to an hour for them to appear.".to_string());
    }
    if features.prefix_commands {
        if config.prefix_is_valid() {
            notes.push(format!(
                "Prefix commands respond to `{}` and need the Message Content intent enabled in the developer portal.",
                config.prefix
            ));
        } else {
            notes.push("Prefix commands need a 1 to 3 character PREFIX set in config.py.".to_string());
        }
    }
    if features.auto_moderation {
        notes.push("Auto moderation reads message content; enable the Message Content intent.".to_string());
    }
    if features.logging {
        notes.push("Logging writes INFO-level output to the console.".to_string());
    }
    notes
}

fn config_diagnostics(config: &BotConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (field, value) in [("name", &config.name), ("description", &config.description)] {
        if non_blank(value).is_none() {
            diagnostics.push(Diagnostic::MissingField {
                field: field.to_string(),
            });
        }
    }
    if !config.prefix_is_valid() {
        diagnostics.push(Diagnostic::InvalidPrefix {
            prefix: config.prefix.clone(),
        });
    }
    diagnostics
}
