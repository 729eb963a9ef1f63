//! Deserializable representation of a capability catalog document.
//!
//! The types mirror `schema/capability_catalog.schema.json`. Use
//! `CapabilityIndex` for validation and id lookup; use these structs when the
//! raw catalog surface is needed (authoring tools, tests).

use crate::catalog::identity::{CapabilityId, CapabilityTag, CatalogKey, Complexity, RiskLevel};
use crate::error::CatalogError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Full capability catalog as stored on disk.
pub struct CapabilityCatalog {
    pub schema_version: String,
    pub key: CatalogKey,
    pub title: String,
    pub capabilities: Vec<Capability>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One selectable feature module and the files it contributes.
pub struct Capability {
    pub id: CapabilityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<CapabilityTag>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub files: Vec<FileTemplate>,
    /// Package names the generated code imports beyond the baseline.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Output path relative to the project root plus the template body.
pub struct FileTemplate {
    pub target_path: String,
    pub template: String,
}

impl Capability {
    /// Start a capability with the two fields every entry must carry.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Result<Self, CatalogError> {
        let id = CapabilityId(id.into());
        if id.0.trim().is_empty() {
            return Err(CatalogError::BlankId);
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle(id));
        }
        Ok(Self {
            id,
            title,
            description: String::new(),
            tags: BTreeSet::new(),
            risk_level: RiskLevel::default(),
            complexity: Complexity::default(),
            files: Vec::new(),
            dependencies: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: CapabilityTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_file(mut self, target_path: impl Into<String>, template: impl Into<String>) -> Self {
        self.files.push(FileTemplate {
            target_path: target_path.into(),
            template: template.into(),
        });
        self
    }

    pub fn with_dependency(mut self, package: impl Into<String>) -> Self {
        self.dependencies.push(package.into());
        self
    }

    pub fn has_tag(&self, tag: &CapabilityTag) -> bool {
        self.tags.contains(tag)
    }
}

/// Read and parse a capability catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<CapabilityCatalog> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let catalog: CapabilityCatalog =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(catalog)
}
