//! Capability catalog wiring.
//!
//! A catalog is an ordered list of capabilities, each contributing file
//! templates to a generated bot. `CapabilityIndex` is the validated entry point
//! (embedded built-in catalog or a JSON file on disk); the model types mirror
//! `schema/capability_catalog.schema.json`.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{CapabilityId, CapabilityTag, CatalogKey, Complexity, RiskLevel};
pub use index::CapabilityIndex;
pub use model::{Capability, CapabilityCatalog, FileTemplate, load_catalog_from_path};
