//! Serializable result of a generation call.
//!
//! A `Generation` is the whole hand-off to export: the bot bundle plus the
//! diagnostics collected while producing it. The JSON form (`--manifest` on
//! the CLI) round-trips, so a saved manifest can be exported later.

use crate::config::BotConfig;
use crate::diagnostics::Diagnostic;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One output file, path relative to the project root.
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Complete generated project.
///
/// `config.selected_capabilities` holds only ids the catalog knew about;
/// `files` paths are unique; `dependencies` is sorted and duplicate-free.
pub struct GeneratedBot {
    pub config: BotConfig,
    pub files: Vec<GeneratedFile>,
    pub dependencies: Vec<String>,
    pub setup_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub bot: GeneratedBot,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedBot {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|file| file.path.as_str())
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|file| file.content.len()).sum()
    }
}

impl Generation {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Read a generation manifest previously written as JSON.
pub fn read_generation<R: Read>(reader: R) -> Result<Generation> {
    serde_json::from_reader(reader).context("unable to parse generation manifest")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Generation {
        Generation {
            bot: GeneratedBot {
                config: BotConfig::new("Sentinel"),
                files: vec![
                    GeneratedFile {
                        path: "main.py".into(),
                        content: "print('hi')\n".into(),
                    },
                    GeneratedFile {
                        path: "cogs/fun.py".into(),
                        content: String::new(),
                    },
                ],
                dependencies: vec!["discord.py".into()],
                setup_instructions: "run it".into(),
            },
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn manifest_round_trips() {
        let generation = sample();
        let json = serde_json::to_vec(&generation).unwrap();
        let back = read_generation(Cursor::new(json)).unwrap();
        assert_eq!(back, generation);
    }

    #[test]
    fn rejects_truncated_manifest() {
        let err = read_generation(Cursor::new(b"{\"bot\": {".to_vec())).unwrap_err();
        assert!(err.to_string().contains("manifest"));
    }

    #[test]
    fn file_lookup_and_sizes() {
        let bot = sample().bot;
        assert!(bot.file("cogs/fun.py").is_some());
        assert!(bot.file("missing.py").is_none());
        assert_eq!(bot.paths().collect::<Vec<_>>(), ["main.py", "cogs/fun.py"]);
        assert_eq!(bot.total_bytes(), 12);
    }
}
