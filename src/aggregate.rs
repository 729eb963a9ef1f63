//! Merge per-capability file contributions into one file set.
//!
//! Contributions are processed in the order given (catalog order when called
//! from the generator). When two contributions target the same normalized
//! path the later one wins: its content replaces the earlier entry in place,
//! so the entry keeps the position of the first writer, and a collision is
//! recorded for the caller.

use crate::bundle::GeneratedFile;
use crate::catalog::CapabilityId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rendered files from a single capability.
pub struct Contribution {
    pub capability: CapabilityId,
    pub files: Vec<GeneratedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollision {
    pub path: String,
    pub previous: CapabilityId,
    pub replaced_by: CapabilityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub files: Vec<GeneratedFile>,
    pub collisions: Vec<PathCollision>,
}

/// Merge contributions with last-wins collision handling.
pub fn aggregate<I>(contributions: I) -> Aggregation
where
    I: IntoIterator<Item = Contribution>,
{
    let mut slots: Vec<(GeneratedFile, CapabilityId)> = Vec::new();
    let mut by_path: BTreeMap<String, usize> = BTreeMap::new();
    let mut collisions = Vec::new();

    for contribution in contributions {
        for file in contribution.files {
            let path = normalize_path(&file.path);
            let file = GeneratedFile {
                path: path.clone(),
                content: file.content,
            };
            match by_path.get(&path) {
                Some(&slot) => {
                    let (existing, owner) = &mut slots[slot];
                    collisions.push(PathCollision {
                        path,
                        previous: owner.clone(),
                        replaced_by: contribution.capability.clone(),
                    });
                    *existing = file;
                    *owner = contribution.capability.clone();
                }
                None => {
                    by_path.insert(path, slots.len());
                    slots.push((file, contribution.capability.clone()));
                }
            }
        }
    }

    Aggregation {
        files: slots.into_iter().map(|(file, _)| file).collect(),
        collisions,
    }
}

/// Canonical spelling of a project-relative path.
///
/// Backslashes become `/`, empty and `.` segments are dropped.
pub fn normalize_path(path: &str) -> String {
    path.trim()
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
