//! Build automation tasks for Triple T
//!
//! Usage:
//!   cargo xtask dist                      # Release build staged for the host platform
//!   cargo xtask dist --platform windows   # Same, named for another platform
//!   cargo xtask clean                     # Remove dist/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Files shipped next to the binary
const CONFIG_FILE: &str = "triton.ron";
const BINARY_NAME: &str = "triple-t";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Triple T")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a release binary and stage it with its config and assets
    Dist {
        /// Target platform: windows, macos, linux (default: host)
        #[arg(long)]
        platform: Option<String>,
    },
    /// Remove the dist/ folder
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dist { platform } => dist(platform),
        Commands::Clean => clean(),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the project root")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

fn host_platform() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "macos"
    } else {
        "linux"
    }
}

/// Build and stage into dist/<platform>/
fn dist(platform: Option<String>) -> Result<()> {
    let root = project_root()?;
    let platform = platform.unwrap_or_else(|| host_platform().to_string());
    let dist = root.join("dist").join(&platform);

    println!("Building release for {}...", platform);
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--bin", BINARY_NAME]),
    )?;

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    let binary = if platform == "windows" {
        format!("{}.exe", BINARY_NAME)
    } else {
        BINARY_NAME.to_string()
    };
    std::fs::copy(root.join("target/release").join(&binary), dist.join(&binary))
        .with_context(|| format!("Failed to copy {}", binary))?;
    std::fs::copy(root.join(CONFIG_FILE), dist.join(CONFIG_FILE))
        .with_context(|| format!("Failed to copy {}", CONFIG_FILE))?;
    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))?;

    println!("Build complete: dist/{}/", platform);
    Ok(())
}

fn clean() -> Result<()> {
    let dist = project_root()?.join("dist");
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
        println!("Removed {}", dist.display());
    }
    Ok(())
}
