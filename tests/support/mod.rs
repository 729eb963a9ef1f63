use anyhow::{Context, Result, bail};
use botsmith::CapabilityIndex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn builtin() -> &'static CapabilityIndex {
    static INDEX: OnceLock<CapabilityIndex> = OnceLock::new();
    INDEX.get_or_init(|| CapabilityIndex::builtin().expect("built-in catalog must load"))
}

/// `botsmith` with a clean environment for catalog and log settings.
pub fn botsmith() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_botsmith"));
    cmd.env_remove("BOTSMITH_CATALOG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
