use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Versioned key for a capability catalog (e.g., `discord_py_builtin_v1`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Stable identifier for an individual capability entry.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityId(pub String);

impl CapabilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Category tag attached to a capability.
///
/// Known variants keep spelling consistent across catalogs; `Other` lets a
/// catalog introduce new categories without breaking older binaries.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CapabilityTag {
    Core,
    Moderation,
    Fun,
    Utility,
    Music,
    Economy,
    Logging,
    Games,
    Social,
    Other(String),
}

/// How much damage a misconfigured capability can do on a live server.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Rough authoring effort of the generated code.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Advanced,
}

impl Serialize for CapabilityTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CapabilityTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

impl CapabilityTag {
    pub fn as_str(&self) -> &str {
        match self {
            CapabilityTag::Core => "core",
            CapabilityTag::Moderation => "moderation",
            CapabilityTag::Fun => "fun",
            CapabilityTag::Utility => "utility",
            CapabilityTag::Music => "music",
            CapabilityTag::Economy => "economy",
            CapabilityTag::Logging => "logging",
            CapabilityTag::Games => "games",
            CapabilityTag::Social => "social",
            CapabilityTag::Other(value) => value.as_str(),
        }
    }

    /// Case-insensitive parse; unknown spellings land in `Other` lowercased.
    pub fn parse(value: &str) -> Self {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "core" => CapabilityTag::Core,
            "moderation" => CapabilityTag::Moderation,
            "fun" => CapabilityTag::Fun,
            "utility" => CapabilityTag::Utility,
            "music" => CapabilityTag::Music,
            "economy" => CapabilityTag::Economy,
            "logging" => CapabilityTag::Logging,
            "games" => CapabilityTag::Games,
            "social" => CapabilityTag::Social,
            _ => CapabilityTag::Other(lowered),
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Advanced => "advanced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_known_and_unknown() {
        let known = CapabilityTag::Moderation;
        let json = serde_json::to_string(&known).unwrap();
        assert_eq!(json, "\"moderation\"");
        let back: CapabilityTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, known);

        let parsed: CapabilityTag = serde_json::from_str("\"Leveling\"").unwrap();
        assert_eq!(parsed, CapabilityTag::Other("leveling".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"leveling\"");
    }

    #[test]
    fn tag_parse_ignores_case_and_whitespace() {
        assert_eq!(CapabilityTag::parse(" FUN "), CapabilityTag::Fun);
        assert_eq!(CapabilityTag::parse("Music"), CapabilityTag::Music);
    }

    #[test]
    fn risk_and_complexity_use_lowercase_names() {
        let risk: RiskLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(risk, RiskLevel::High);
        assert_eq!(risk.as_str(), "high");

        let complexity: Complexity = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(complexity, Complexity::Moderate);
        assert!(serde_json::from_str::<Complexity>("\"extreme\"").is_err());
    }

    #[test]
    fn capability_id_is_transparent() {
        let id = CapabilityId::new("moderation");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"moderation\"");
        assert_eq!(id.to_string(), "moderation");
    }
}
