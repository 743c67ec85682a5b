use anyhow::Result;
use clap::{Parser, Subcommand};
use roomview_assets::SceneManifest;
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for roomview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the mesh parsing bench
    Bench,
    /// Verify every file the scene manifest references exists
    Assets {
        /// Asset root
        #[arg(long, default_value = "./assets")]
        dir: PathBuf,
        /// Manifest to check; the built-in room scene when absent
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"];
const TEST: &[&str] = &["test", "--workspace"];
const DOC: &[&str] = &["doc", "--workspace", "--no-deps"];
const BUILD: &[&str] = &["build", "--workspace"];
const BENCH: &[&str] = &["bench", "-p", "roomview-assets", "--bench", "bench_ply_parse"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for args in [FMT, CLIPPY, TEST, DOC] {
                cargo(args)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Doc => cargo(DOC)?,
        Commands::Build => cargo(BUILD)?,
        Commands::Bench => cargo(BENCH)?,
        Commands::Assets { dir, manifest } => check_assets(dir, manifest)?,
    }

    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args[0]);
    }
    Ok(())
}

fn check_assets(dir: PathBuf, manifest: Option<PathBuf>) -> Result<()> {
    let manifest = match manifest {
        Some(path) => SceneManifest::load(path)?,
        None => SceneManifest::room(),
    }
    .resolve(&dir);

    println!("==> Checking assets under {}", dir.display());
    let missing = manifest.missing_files();
    for path in &missing {
        println!("missing: {}", path.display());
    }
    if !missing.is_empty() {
        anyhow::bail!("{} referenced files are missing", missing.len());
    }
    println!(
        "all {} entries and both shader stages present",
        manifest.entries.len()
    );
    Ok(())
}
