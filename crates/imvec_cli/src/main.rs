//! imvec - replay immediate-mode frame captures
//!
//! - `dump`: replay through the recording target and print every native call
//! - `render`: rasterize through the software target into a PNG
//! - `config`: print the default renderer configuration

mod capture;
mod replay;

use anyhow::{Context, Result};
use capture::Capture;
use clap::{Parser, Subcommand};
use imvec_core::PackedColor;
use imvec_renderer::RendererConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Replay immediate-mode draw data through the imvec renderer
#[derive(Parser, Debug)]
#[command(name = "imvec")]
#[command(about = "Replay immediate-mode frame captures through the imvec renderer")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the native command stream and frame stats of a capture
    Dump {
        capture: PathBuf,

        /// Renderer configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print stats as JSON only
        #[arg(long)]
        stats_only: bool,
    },
    /// Rasterize a capture into a PNG
    Render {
        capture: PathBuf,

        #[arg(short, long, default_value = "frame.png")]
        out: PathBuf,

        /// Override the framebuffer width
        #[arg(long)]
        width: Option<u32>,

        /// Override the framebuffer height
        #[arg(long)]
        height: Option<u32>,

        /// Clear color as RRGGBBAA
        #[arg(long, default_value = "000000FF")]
        background: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Dump {
            capture,
            config,
            stats_only,
        } => cmd_dump(&capture, config.as_deref(), stats_only),
        Command::Render {
            capture,
            out,
            width,
            height,
            background,
            config,
        } => cmd_render(&capture, &out, (width, height), &background, config.as_deref()),
        Command::Config => cmd_config(),
    }
}

fn load_config(path: Option<&Path>) -> Result<RendererConfig> {
    match path {
        Some(path) => RendererConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(RendererConfig::default()),
    }
}

fn cmd_dump(path: &Path, config: Option<&Path>, stats_only: bool) -> Result<()> {
    let config = load_config(config)?;
    let capture = Capture::load(path)?;
    let size = capture.framebuffer_size();
    let frame = capture.into_frame()?;
    tracing::info!(
        "Replaying {} at {}x{}: {} vertices, {} indices",
        path.display(),
        size.0,
        size.1,
        frame.draw_data.total_vtx_count(),
        frame.draw_data.total_idx_count()
    );

    let recorded = replay::record(frame, size, config)?;
    if !stats_only {
        for command in &recorded.commands {
            println!("{:?}", command);
        }
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&recorded.stats).context("Failed to serialize stats")?
    );
    Ok(())
}

fn cmd_render(
    path: &Path,
    out: &Path,
    size: (Option<u32>, Option<u32>),
    background: &str,
    config: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let background = PackedColor::from_hex_rgba(background)
        .with_context(|| format!("Invalid background {:?}, expected RRGGBBAA", background))?;
    let capture = Capture::load(path)?;
    let (w, h) = capture.framebuffer_size();
    let size = (size.0.unwrap_or(w), size.1.unwrap_or(h));

    let (target, stats) = replay::rasterize(capture.into_frame()?, size, config, background)?;
    target
        .save_png(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "Wrote {} ({}x{}): {} polygons, {} glyphs",
        out.display(),
        size.0,
        size.1,
        stats.polygons,
        stats.glyphs
    );
    Ok(())
}

fn cmd_config() -> Result<()> {
    let toml = RendererConfig::default()
        .to_toml()
        .context("Failed to serialize config")?;
    print!("{}", toml);
    Ok(())
}
