use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use roomview_assets::{ImageTextureProvider, PlyHeader, SceneManifest, parse_ply};
use roomview_input::InputScript;
use roomview_kernel::SimulationState;
use roomview_render::{DebugTextDevice, FrameDriver, ProgramCompiler, SceneCatalog, ScriptedHost};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomview-cli", about = "CLI tool for roomview assets and camera replay")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Parse one mesh file and report what was read
    Inspect {
        /// Path to an ASCII PLY file
        path: PathBuf,
    },
    /// Write the built-in room manifest as JSON
    Manifest {
        /// Output file; printed to stdout when absent
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replay scripted camera input through the headless debug device
    Replay {
        /// Input script, e.g. "f*10 r*5 fl ."
        script: String,
        /// Asset root; manifest paths resolve against it
        #[arg(long, default_value = "./assets")]
        assets: PathBuf,
        /// Scene manifest (JSON); the built-in room scene when absent
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Print the full device log
        #[arg(long)]
        log: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("roomview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", roomview_assets::crate_info());
            println!("render: {}", roomview_render::crate_info());
            let manifest = SceneManifest::room();
            println!("scene: {} entries", manifest.entries.len());
            for entry in &manifest.entries {
                println!(
                    "  {:<14} {} + {}",
                    entry.name(),
                    entry.geometry.display(),
                    entry.texture.display()
                );
            }
        }
        Commands::Inspect { path } => inspect(&path)?,
        Commands::Manifest { out } => {
            let manifest = SceneManifest::room();
            match out {
                Some(path) => {
                    manifest.save(&path)?;
                    println!("wrote {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&manifest)?),
            }
        }
        Commands::Replay {
            script,
            assets,
            manifest,
            log,
        } => replay(&script, &assets, manifest.as_deref(), log)?,
    }

    Ok(())
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let report = inspect_text(&String::from_utf8_lossy(&bytes));
    print!("{}", report.text);
    match report.error {
        Some(err) => bail!("{}: {err}", path.display()),
        None => Ok(()),
    }
}

struct Inspection {
    text: String,
    error: Option<roomview_assets::PlyError>,
}

/// Describe a mesh the same way the viewer reads it.
fn inspect_text(text: &str) -> Inspection {
    let mut out = String::new();
    if let Ok((header, _)) = PlyHeader::parse(text) {
        let _ = writeln!(
            out,
            "header: {} vertices, {} faces declared",
            header.vertex_count, header.face_count
        );
        let _ = writeln!(
            out,
            "layout: normals={} colors={} uvs={}",
            header.layout.normals, header.layout.colors, header.layout.uvs
        );
    }

    let load = parse_ply(text);
    let _ = writeln!(
        out,
        "read: {} vertices, {} triangles",
        load.mesh.vertex_count(),
        load.mesh.triangle_count()
    );
    if let Some((lo, hi)) = bounds(&load.mesh) {
        let _ = writeln!(
            out,
            "bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
        );
    }
    if let Some(err) = &load.error {
        let stage = if err.is_header_error() { "header rejected" } else { "body stopped early" };
        let _ = writeln!(out, "{stage}: {err}");
    }
    Inspection {
        text: out,
        error: load.error,
    }
}

fn bounds(mesh: &roomview_common::Mesh) -> Option<(glam::Vec3, glam::Vec3)> {
    let first = mesh.vertices.first()?.position;
    Some(mesh.vertices.iter().fold((first, first), |(lo, hi), v| {
        (lo.min(v.position), hi.max(v.position))
    }))
}

fn replay(script: &str, assets: &Path, manifest: Option<&Path>, log: bool) -> anyhow::Result<()> {
    let script: InputScript = script.parse()?;
    let manifest = match manifest {
        Some(path) => SceneManifest::load(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?,
        None => SceneManifest::room(),
    }
    .resolve(assets);

    let mut device = DebugTextDevice::new();
    let program = ProgramCompiler::new()
        .compile(&mut device, &manifest.program)
        .context("failed to build shader program")?;
    let (catalog, report) = SceneCatalog::load(
        &mut device,
        &manifest.entries,
        &program,
        &ImageTextureProvider,
    );
    for (entry, err) in &report.failed {
        println!("skipped {}: {err}", entry.name());
    }

    let driver = FrameDriver::default();
    let expected = SimulationState::default().replay(driver.controller(), script.clone());
    let frames = script.len();
    tracing::debug!("replaying {frames} frames over {} renderables", catalog.len());
    let mut host = ScriptedHost::new(script);
    let finished = driver.run(&mut host, &mut device, &catalog, SimulationState::default())?;

    if log {
        print!("{}", device.output());
    }
    println!(
        "replayed {frames} frames, {} draws over {} renderables",
        device.draw_labels().len(),
        catalog.len()
    );
    let pose = finished.camera;
    println!(
        "camera: position=({:.4}, {:.4}, {:.4}) yaw={:.1}",
        pose.position.x, pose.position.y, pose.position.z, pose.yaw_degrees
    );
    println!(
        "kernel replay: {}",
        if finished == expected { "OK" } else { "MISMATCH" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\n\
                            property float y\nproperty float z\nelement face 1\n\
                            property list uchar int vertex_indices\nend_header\n\
                            0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";

    #[test]
    fn invalid_utf8_is_inspected_like_the_viewer_reads_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.ply");
        let mut bytes = b"ply\ncomment caf\xe9\n".to_vec();
        bytes.extend_from_slice(TRIANGLE.trim_start_matches("ply\n").as_bytes());
        std::fs::write(&path, &bytes).unwrap();

        assert!(inspect(&path).is_ok());
        assert!(roomview_assets::load_ply(&path).is_complete());
    }

    #[test]
    fn report_lists_counts_and_bounds() {
        let report = inspect_text(TRIANGLE);
        assert!(report.error.is_none());
        assert!(report.text.contains("header: 3 vertices, 1 faces declared"));
        assert!(report.text.contains("read: 3 vertices, 1 triangles"));
        assert!(report.text.contains("bounds: (0.000, 0.000, 0.000) .. (1.000, 1.000, 0.000)"));
    }

    #[test]
    fn report_separates_header_and_body_failures() {
        let header = inspect_text("ply\nformat binary_little_endian 1.0\nend_header\n");
        assert!(header.text.contains("header rejected"));

        let body = inspect_text(&TRIANGLE.replace("3 0 1 2", "4 0 1 2 0"));
        assert!(body.text.contains("body stopped early"));
        assert!(body.text.contains("read: 3 vertices, 0 triangles"));
    }
}
