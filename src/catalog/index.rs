//! Indexed, validated view of a capability catalog.
//!
//! The index is the only way generation reaches catalog data: construction
//! rejects empty catalogs, blank or duplicate ids, and target paths that would
//! land outside the generated project. Insertion order is preserved because it
//! is both the display order and the order capabilities are processed in.

use crate::catalog::identity::{CapabilityId, CapabilityTag, CatalogKey};
use crate::catalog::model::{Capability, CapabilityCatalog};
use crate::error::CatalogError;
use crate::schema_loader::{load_json_schema, validate_document};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const CATALOG_SCHEMA: &str = include_str!("../../schema/capability_catalog.schema.json");
const BUILTIN_CATALOG: &str = include_str!("../../catalog/capabilities.json");
const INLINE_CATALOG_KEY: &str = "inline";

#[derive(Debug, Clone)]
/// Capability list plus a derived id index.
pub struct CapabilityIndex {
    key: CatalogKey,
    title: String,
    capabilities: Vec<Capability>,
    by_id: BTreeMap<CapabilityId, usize>,
}

impl CapabilityIndex {
    /// Build an index from capabilities supplied in memory.
    pub fn from_capabilities(capabilities: Vec<Capability>) -> Result<Self, CatalogError> {
        Self::build(
            CatalogKey(INLINE_CATALOG_KEY.to_string()),
            String::new(),
            capabilities,
        )
    }

    /// Build an index from a parsed catalog document.
    pub fn from_catalog(catalog: CapabilityCatalog) -> Result<Self, CatalogError> {
        Self::build(catalog.key, catalog.title, catalog.capabilities)
    }

    /// Load a catalog file, validating it against the embedded schema first.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        validate_against_schema(&value, &path.display().to_string())?;

        let catalog: CapabilityCatalog = serde_json::from_value(value)
            .with_context(|| format!("decoding catalog {}", path.display()))?;
        Self::from_catalog(catalog).with_context(|| format!("indexing {}", path.display()))
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> Result<Self> {
        let value: Value =
            serde_json::from_str(BUILTIN_CATALOG).context("parsing built-in catalog")?;
        validate_against_schema(&value, "built-in catalog")?;
        let catalog: CapabilityCatalog =
            serde_json::from_value(value).context("decoding built-in catalog")?;
        Self::from_catalog(catalog).context("indexing built-in catalog")
    }

    fn build(
        key: CatalogKey,
        title: String,
        capabilities: Vec<Capability>,
    ) -> Result<Self, CatalogError> {
        let by_id = build_index(&capabilities)?;
        Ok(Self {
            key,
            title,
            capabilities,
            by_id,
        })
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Resolve a capability by id.
    pub fn lookup(&self, id: &CapabilityId) -> Option<&Capability> {
        self.by_id.get(id).map(|&slot| &self.capabilities[slot])
    }

    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Capabilities in catalog order.
    pub fn list(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Capability ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &CapabilityId> {
        self.capabilities.iter().map(|cap| &cap.id)
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Every tag used by at least one capability, sorted.
    pub fn categories(&self) -> BTreeSet<&CapabilityTag> {
        self.capabilities
            .iter()
            .flat_map(|cap| cap.tags.iter())
            .collect()
    }

    /// Case-insensitive search over title, description and tags.
    ///
    /// A blank query matches everything; `tag` narrows the result to
    /// capabilities carrying that tag. Catalog order is kept.
    pub fn search(&self, query: &str, tag: Option<&CapabilityTag>) -> Vec<&Capability> {
        let needle = query.trim().to_lowercase();
        self.capabilities
            .iter()
            .filter(|cap| tag.is_none_or(|tag| cap.has_tag(tag)))
            .filter(|cap| needle.is_empty() || matches_query(cap, &needle))
            .collect()
    }
}

fn matches_query(cap: &Capability, needle: &str) -> bool {
    cap.title.to_lowercase().contains(needle)
        || cap.description.to_lowercase().contains(needle)
        || cap.tags.iter().any(|tag| tag.as_str().contains(needle))
}

fn build_index(capabilities: &[Capability]) -> Result<BTreeMap<CapabilityId, usize>, CatalogError> {
    if capabilities.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut map = BTreeMap::new();
    for (position, cap) in capabilities.iter().enumerate() {
        if cap.id.0.trim().is_empty() {
            return Err(CatalogError::EmptyId { position });
        }
        if map.contains_key(&cap.id) {
            return Err(CatalogError::DuplicateId(cap.id.clone()));
        }
        if cap.title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle(cap.id.clone()));
        }
        for file in &cap.files {
            if let Some(reason) = target_path_problem(&file.target_path) {
                return Err(CatalogError::InvalidTargetPath {
                    id: cap.id.clone(),
                    path: file.target_path.clone(),
                    reason,
                });
            }
        }
        map.insert(cap.id.clone(), position);
    }
    Ok(map)
}

/// Target paths are project-relative with forward or back slashes.
fn target_path_problem(path: &str) -> Option<&'static str> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Some("path is empty");
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') || trimmed.contains(':') {
        return Some("path must be relative to the project root");
    }
    let mut segments = trimmed
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .peekable();
    if segments.peek().is_none() {
        return Some("path names no file");
    }
    if segments.any(|segment| segment == "..") {
        return Some("path must not contain '..' segments");
    }
    if trimmed.ends_with('/') || trimmed.ends_with('\\') {
        return Some("path names a directory");
    }
    None
}

fn validate_against_schema(document: &Value, label: &str) -> Result<()> {
    let schema = load_json_schema(CATALOG_SCHEMA, "capability_catalog.schema.json")?;
    validate_document(&schema, document, label)
}
