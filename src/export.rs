//! Write a generated bot to disk, as a directory tree or a zip archive.
//!
//! Every path is checked before anything is written. Path problems, including
//! repeats and files standing where a directory is needed, abort before the
//! first write, as does an existing file when overwriting is off.

use crate::bundle::GeneratedBot;
use crate::config::project_slug;
use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Replace files that already exist under the destination.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub destination: PathBuf,
    pub files_written: usize,
    pub bytes_written: u64,
}

/// Materialize `bot` under `root`, creating directories as needed.
pub fn write_to_dir(bot: &GeneratedBot, root: &Path, options: ExportOptions) -> Result<ExportSummary> {
    let planned = plan_files(bot)?;
    if root.exists() && !root.is_dir() {
        bail!("{} exists and is not a directory", root.display());
    }
    for (relative, _) in &planned {
        for ancestor in relative.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            let dir = root.join(ancestor);
            if dir.exists() && !dir.is_dir() {
                bail!("{} exists and is not a directory", dir.display());
            }
        }
        let target = root.join(relative);
        if target.is_dir() {
            bail!("{} is a directory", target.display());
        }
        if !options.overwrite && target.exists() {
            bail!(
                "{} already exists; pass --force to overwrite",
                target.display()
            );
        }
    }

    fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;
    let mut bytes_written = 0u64;
    for (relative, content) in &planned {
        let target = root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&target, content).with_context(|| format!("writing {}", target.display()))?;
        debug!(path = %target.display(), bytes = content.len(), "wrote file");
        bytes_written += content.len() as u64;
    }

    info!(
        destination = %root.display(),
        files = planned.len(),
        bytes = bytes_written,
        "exported bot project"
    );
    Ok(ExportSummary {
        destination: root.to_path_buf(),
        files_written: planned.len(),
        bytes_written,
    })
}

/// Write `bot` as a zip archive with every entry under the project slug.
///
/// Entries carry a fixed timestamp and keep bundle order, so the same bundle
/// always yields the same archive bytes.
pub fn write_zip(bot: &GeneratedBot, archive_path: &Path) -> Result<ExportSummary> {
    let folder = project_slug(&bot.config.name);
    let entries: Vec<(String, &[u8])> = plan_files(bot)?
        .into_iter()
        .map(|(relative, content)| (entry_name(&folder, &relative), content))
        .collect();

    let parent = match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    let temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temp archive in {}", parent.display()))?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);
    let mut zip = ZipWriter::new(temp);
    let mut bytes_written = 0u64;
    for (name, content) in &entries {
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("adding {name} to archive"))?;
        zip.write_all(content)
            .with_context(|| format!("writing {name} to archive"))?;
        debug!(entry = %name, bytes = content.len(), "archived file");
        bytes_written += content.len() as u64;
    }
    let temp = zip.finish().context("finalizing zip archive")?;
    temp.persist(archive_path)
        .with_context(|| format!("persisting {}", archive_path.display()))?;

    info!(
        archive = %archive_path.display(),
        files = entries.len(),
        bytes = bytes_written,
        "exported bot archive"
    );
    Ok(ExportSummary {
        destination: archive_path.to_path_buf(),
        files_written: entries.len(),
        bytes_written,
    })
}

/// Sanitized relative paths for every bundle file.
///
/// Two spellings of one path, or a path used as both a file and a directory,
/// are rejected here so neither writer can fail halfway through.
fn plan_files(bot: &GeneratedBot) -> Result<Vec<(PathBuf, &[u8])>> {
    let mut seen = BTreeSet::new();
    let mut planned = Vec::with_capacity(bot.files.len());
    for file in &bot.files {
        let relative = safe_relative_path(&file.path)?;
        if !seen.insert(relative.clone()) {
            bail!("bundle lists '{}' more than once", relative.display());
        }
        planned.push((relative, file.content.as_bytes()));
    }
    for (relative, _) in &planned {
        if let Some(dir) = relative.ancestors().skip(1).find(|a| seen.contains(*a)) {
            bail!(
                "bundle uses '{}' as both a file and a directory",
                dir.display()
            );
        }
    }
    Ok(planned)
}

fn entry_name(folder: &str, relative: &Path) -> String {
    let mut name = folder.to_string();
    for segment in relative.iter() {
        name.push('/');
        name.push_str(&segment.to_string_lossy());
    }
    name
}

/// Turn a bundle path into a relative path that stays inside the project.
pub fn safe_relative_path(path: &str) -> Result<PathBuf> {
    let normalized = path.replace('\\', "/");
    let mut relative = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir => {}
            Component::ParentDir => bail!("refusing to export '{path}': it leaves the project root"),
            Component::RootDir | Component::Prefix(_) => {
                bail!("refusing to export '{path}': absolute paths are not allowed")
            }
        }
    }
    if relative.as_os_str().is_empty() {
        bail!("refusing to export an empty path");
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::GeneratedFile;
    use crate::config::BotConfig;
    use std::io::Read;
    use tempfile::TempDir;

    fn bot(files: &[(&str, &str)]) -> GeneratedBot {
        GeneratedBot {
            config: BotConfig::new("Night Watch"),
            files: files
                .iter()
                .map(|(path, content)| GeneratedFile {
                    path: path.to_string(),
                    content: content.to_string(),
                })
                .collect(),
            dependencies: vec!["discord.py".into()],
            setup_instructions: String::new(),
        }
    }

    #[test]
    fn writes_nested_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("out");
        let bundle = bot(&[("main.py", "print()\n"), ("cogs/fun.py", "# fun\n")]);
        let summary = write_to_dir(&bundle, &root, ExportOptions::default()).unwrap();
        assert_eq!(summary.files_written, 2);
        assert_eq!(summary.bytes_written, 14);
        assert_eq!(fs::read_to_string(root.join("cogs/fun.py")).unwrap(), "# fun\n");
    }

    #[test]
    fn refuses_to_clobber_without_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.py"), "mine").unwrap();
        let bundle = bot(&[("config.py", "c"), ("main.py", "generated")]);

        let err = write_to_dir(&bundle, dir.path(), ExportOptions::default()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(!dir.path().join("config.py").exists());
        assert_eq!(fs::read_to_string(dir.path().join("main.py")).unwrap(), "mine");

        write_to_dir(&bundle, dir.path(), ExportOptions { overwrite: true }).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("main.py")).unwrap(),
            "generated"
        );
    }

    #[test]
    fn rejects_escaping_paths() {
        for bad in ["../evil.py", "cogs/../../evil.py", "/etc/passwd", "", "./"] {
            assert!(safe_relative_path(bad).is_err(), "{bad:?}");
        }
        assert_eq!(
            safe_relative_path("./cogs\\fun.py").unwrap(),
            PathBuf::from("cogs").join("fun.py")
        );

        let dir = TempDir::new().unwrap();
        let bundle = bot(&[("ok.py", "x"), ("../evil.py", "x")]);
        assert!(write_to_dir(&bundle, dir.path(), ExportOptions::default()).is_err());
        assert!(!dir.path().join("ok.py").exists());
    }

    #[test]
    fn zip_entries_sit_under_slug_folder() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("bot.zip");
        let bundle = bot(&[("main.py", "print()\n"), ("cogs/fun.py", "# fun\n")]);
        let summary = write_zip(&bundle, &archive_path).unwrap();
        assert_eq!(summary.files_written, 2);

        let mut archive = zip::ZipArchive::new(fs::File::open(&archive_path).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["night-watch/main.py", "night-watch/cogs/fun.py"]);

        let mut content = String::new();
        archive
            .by_name("night-watch/cogs/fun.py")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "# fun\n");
    }

    #[test]
    fn zip_output_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let bundle = bot(&[("main.py", "print()\n")]);
        let first = dir.path().join("a.zip");
        let second = dir.path().join("b.zip");
        write_zip(&bundle, &first).unwrap();
        write_zip(&bundle, &second).unwrap();
        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn zip_entry_names_use_sanitized_paths() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("bot.zip");
        write_zip(&bot(&[("./cogs\\fun.py", "a")]), &archive_path).unwrap();

        let mut archive = zip::ZipArchive::new(fs::File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "night-watch/cogs/fun.py");
    }

    #[test]
    fn zip_rejects_two_spellings_of_one_path() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("bot.zip");
        let bundle = bot(&[("./cogs\\fun.py", "a"), ("cogs/fun.py", "b")]);
        let err = write_zip(&bundle, &archive_path).unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err:#}");
        assert!(!archive_path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn duplicate_paths_write_nothing() {
        let dir = TempDir::new().unwrap();
        let bundle = bot(&[("a.py", "first"), ("./a.py", "second")]);
        let err = write_to_dir(&bundle, dir.path(), ExportOptions { overwrite: true }).unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err:#}");
        assert!(!dir.path().join("a.py").exists());
    }

    #[test]
    fn existing_file_in_place_of_directory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cogs"), "not a dir").unwrap();
        let bundle = bot(&[("main.py", "m"), ("cogs/fun.py", "f")]);
        let err = write_to_dir(&bundle, dir.path(), ExportOptions { overwrite: true }).unwrap_err();
        assert!(err.to_string().contains("not a directory"), "{err:#}");
        assert!(!dir.path().join("main.py").exists());
    }

    #[test]
    fn path_used_as_file_and_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let bundle = bot(&[("cogs", "oops"), ("cogs/fun.py", "f")]);
        assert!(write_to_dir(&bundle, dir.path(), ExportOptions::default()).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
