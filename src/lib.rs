//! Catalog-driven generator for discord.py bot projects.
//!
//! A bot profile (`BotConfig`) plus a capability catalog goes in; a
//! `Generation` comes out, holding the rendered project files, the resolved
//! package list, setup text and any diagnostics. The core (`catalog`,
//! `render`, `aggregate`, `generator`) is pure. Disk access lives at the edges:
//! JSON loaders in `catalog` and `config`, and the `export` writers used by
//! the `botsmith` binary.

use anyhow::Result;
use std::path::Path;

pub mod aggregate;
pub mod bundle;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod generator;
pub mod render;
mod schema_loader;

pub use aggregate::{Aggregation, Contribution, PathCollision, aggregate, normalize_path};
pub use bundle::{GeneratedBot, GeneratedFile, Generation, read_generation};
pub use catalog::{
    Capability, CapabilityCatalog, CapabilityId, CapabilityIndex, CapabilityTag, CatalogKey,
    Complexity, FileTemplate, RiskLevel, load_catalog_from_path,
};
pub use config::{BotConfig, Features, Theme, load_config_from_path, project_slug};
pub use diagnostics::Diagnostic;
pub use error::{CatalogError, GenerateError};
pub use export::{ExportOptions, ExportSummary, write_to_dir, write_zip};
pub use generator::{generate, generate_with_index};
pub use render::{Rendered, TemplateValues, render, render_report};

/// Load the catalog at `path`, or the embedded built-in one when absent.
pub fn resolve_catalog(path: Option<&Path>) -> Result<CapabilityIndex> {
    match path {
        Some(path) => CapabilityIndex::load(path),
        None => CapabilityIndex::builtin(),
    }
}

/// Split comma- or whitespace-delimited lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
