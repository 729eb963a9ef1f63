//! Soft conditions reported next to a successful generation.
//!
//! None of these stop generation. The caller decides whether to show them;
//! the core never prints them itself.

use crate::catalog::CapabilityId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A profile field was blank; placeholders for it stay unresolved.
    MissingField { field: String },
    /// The prefix is not 1 to 3 characters; `@@prefix@@` stays unresolved.
    InvalidPrefix { prefix: String },
    /// A selected id does not exist in the catalog and was dropped.
    UnknownCapability { id: CapabilityId },
    /// A template referenced a name with no value.
    UnresolvedPlaceholder {
        capability: CapabilityId,
        path: String,
        name: String,
    },
    /// Two contributions targeted one path; the later one was kept.
    PathCollision {
        path: String,
        previous: CapabilityId,
        replaced_by: CapabilityId,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingField { field } => {
                write!(f, "bot {field} is empty; its placeholders were left unresolved")
            }
            Diagnostic::InvalidPrefix { prefix } => {
                write!(f, "prefix '{prefix}' must be 1 to 3 characters; left unresolved")
            }
            Diagnostic::UnknownCapability { id } => {
                write!(f, "unknown capability '{id}' was ignored")
            }
            Diagnostic::UnresolvedPlaceholder {
                capability,
                path,
                name,
            } => write!(f, "{path} ({capability}): placeholder @@{name}@@ has no value"),
            Diagnostic::PathCollision {
                path,
                previous,
                replaced_by,
            } => write!(f, "{path}: output of '{replaced_by}' replaced output of '{previous}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_kind_tag() {
        let diag = Diagnostic::PathCollision {
            path: "cogs/fun.py".into(),
            previous: CapabilityId::new("fun"),
            replaced_by: CapabilityId::new("games"),
        };
        assert_eq!(
            serde_json::to_value(&diag).unwrap(),
            json!({
                "kind": "path_collision",
                "path": "cogs/fun.py",
                "previous": "fun",
                "replaced_by": "games"
            })
        );
    }

    #[test]
    fn display_names_the_placeholder() {
        let diag = Diagnostic::UnresolvedPlaceholder {
            capability: CapabilityId::new("core"),
            path: "config.py".into(),
            name: "botName".into(),
        };
        assert_eq!(
            diag.to_string(),
            "config.py (core): placeholder @@botName@@ has no value"
        );
    }
}
