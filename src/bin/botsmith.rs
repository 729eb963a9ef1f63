//! Command-line front end for the bot generator.
//!
//! `generate` reads a JSON bot profile, renders it against the built-in
//! catalog (or `--catalog` / `BOTSMITH_CATALOG`), reports diagnostics on
//! stderr and writes the project as a directory, a zip archive, or a JSON
//! manifest that `export` can materialize later.

use anyhow::{Context, Result};
use botsmith::{
    CapabilityId, CapabilityIndex, CapabilityTag, ExportOptions, Generation, generate_with_index,
    load_config_from_path, read_generation, render, resolve_catalog, split_list, write_to_dir,
    write_zip,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "botsmith", version)]
#[command(about = "Generate discord.py bot projects from a capability catalog")]
struct Cli {
    /// Capability catalog JSON file; the built-in catalog is used when unset.
    #[arg(long, global = true, env = "BOTSMITH_CATALOG", value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Raise log verbosity (`RUST_LOG` takes precedence).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog capabilities.
    List {
        /// Case-insensitive text to match against title, description or tags.
        #[arg(long)]
        search: Option<String>,
        /// Only show capabilities carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one capability and the files it contributes.
    Show { id: String },
    /// Validate a catalog file.
    CheckCatalog { path: PathBuf },
    /// Generate a bot project from a JSON profile.
    Generate(GenerateArgs),
    /// Write out a manifest saved earlier with `generate --manifest`.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Bot profile JSON file.
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Extra capability ids to select (comma or space separated).
    #[arg(long = "with", value_name = "IDS")]
    with_ids: Vec<String>,

    #[command(flatten)]
    target: GenerateTarget,

    /// Overwrite existing files under --out.
    #[arg(long, requires = "out")]
    force: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct GenerateTarget {
    /// Write the project into this directory.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Write the project as a zip archive.
    #[arg(long, value_name = "FILE")]
    zip: Option<PathBuf>,
    /// Print the generation as JSON on stdout.
    #[arg(long)]
    manifest: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Manifest produced by `generate --manifest`.
    manifest: PathBuf,

    #[command(flatten)]
    target: ExportTarget,

    /// Overwrite existing files under --out.
    #[arg(long, requires = "out")]
    force: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ExportTarget {
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    zip: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::List { search, tag } => {
            let index = resolve_catalog(cli.catalog.as_deref())?;
            list(&index, search.as_deref().unwrap_or(""), tag.as_deref())
        }
        Command::Show { id } => {
            let index = resolve_catalog(cli.catalog.as_deref())?;
            show(&index, &CapabilityId::new(id))
        }
        Command::CheckCatalog { path } => {
            let index = CapabilityIndex::load(&path)?;
            println!(
                "{}: catalog '{}' OK ({} capabilities)",
                path.display(),
                index.key().0,
                index.len()
            );
            Ok(())
        }
        Command::Generate(args) => {
            let index = resolve_catalog(cli.catalog.as_deref())?;
            let mut config = load_config_from_path(&args.config)?;
            for raw in &args.with_ids {
                config
                    .selected_capabilities
                    .extend(split_list(raw).into_iter().map(CapabilityId::new));
            }
            let generation = generate_with_index(config, &index);
            for diagnostic in &generation.diagnostics {
                warn!("{diagnostic}");
            }
            if args.target.manifest {
                return print_manifest(&generation);
            }
            emit(&generation, args.target.out, args.target.zip, args.force)
        }
        Command::Export(args) => {
            let file = File::open(&args.manifest)
                .with_context(|| format!("opening manifest {}", args.manifest.display()))?;
            let generation = read_generation(BufReader::new(file))?;
            emit(&generation, args.target.out, args.target.zip, args.force)
        }
    }
}

fn init_tracing(verbose: u8) {
    let fallback = if verbose > 0 { "botsmith=debug" } else { "botsmith=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn list(index: &CapabilityIndex, query: &str, tag: Option<&str>) -> Result<()> {
    let tag = tag.map(CapabilityTag::parse);
    let matches = index.search(query, tag.as_ref());
    let mut out = io::stdout().lock();
    for cap in &matches {
        let tags: Vec<&str> = cap.tags.iter().map(CapabilityTag::as_str).collect();
        writeln!(
            out,
            "{:<16} {:<6} {:<9} {:<24} {}",
            cap.id.as_str(),
            cap.risk_level.as_str(),
            cap.complexity.as_str(),
            cap.title,
            tags.join(",")
        )?;
    }
    if matches.is_empty() {
        writeln!(out, "no capabilities matched")?;
    }
    Ok(())
}

fn show(index: &CapabilityIndex, id: &CapabilityId) -> Result<()> {
    let cap = index
        .lookup(id)
        .with_context(|| format!("capability '{id}' is not in catalog '{}'", index.key().0))?;
    let tags: Vec<&str> = cap.tags.iter().map(CapabilityTag::as_str).collect();
    let mut out = io::stdout().lock();
    writeln!(out, "{} ({})", cap.title, cap.id)?;
    if !cap.description.is_empty() {
        writeln!(out, "{}", cap.description)?;
    }
    writeln!(out, "tags: {}", tags.join(", "))?;
    writeln!(
        out,
        "risk: {}  complexity: {}",
        cap.risk_level.as_str(),
        cap.complexity.as_str()
    )?;
    if !cap.dependencies.is_empty() {
        writeln!(out, "packages: {}", cap.dependencies.join(", "))?;
    }
    writeln!(out, "files:")?;
    for file in &cap.files {
        let names = render::placeholders(&file.template);
        if names.is_empty() {
            writeln!(out, "  {}", file.target_path)?;
        } else {
            writeln!(out, "  {}  [{}]", file.target_path, names.join(", "))?;
        }
    }
    Ok(())
}

fn print_manifest(generation: &Generation) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, generation).context("serializing manifest")?;
    writeln!(out)?;
    Ok(())
}

fn emit(
    generation: &Generation,
    out_dir: Option<PathBuf>,
    zip: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let summary = match (out_dir, zip) {
        (Some(dir), _) => write_to_dir(&generation.bot, &dir, ExportOptions { overwrite: force })?,
        (None, Some(archive)) => write_zip(&generation.bot, &archive)?,
        (None, None) => anyhow::bail!("no export target given"),
    };
    println!(
        "wrote {} files ({} bytes) to {}",
        summary.files_written,
        summary.bytes_written,
        summary.destination.display()
    );
    println!();
    print!("{}", generation.bot.setup_instructions);
    Ok(())
}
