//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use parley_aix::config::parse_resize_setting;
use parley_assets::ResizeMode;

/// Turn chat conversations into model-ready generation requests
#[derive(Parser, Debug)]
#[command(name = "parley", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for machine consumption
    Json,
}

/// A resize mode name, or `none` to disable resizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeSetting(pub Option<ResizeMode>);

fn parse_resize(value: &str) -> Result<ResizeSetting, String> {
    parse_resize_setting(value).map(ResizeSetting).ok_or_else(|| {
        let modes: Vec<_> = ResizeMode::ALL.iter().map(ResizeMode::as_str).collect();
        format!("expected 'none' or one of: {}", modes.join(", "))
    })
}

fn parse_mode(value: &str) -> Result<ResizeMode, String> {
    value.parse().map_err(|e: parley_assets::AssetError| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a conversation file into a generation request (JSON on stdout)
    Convert {
        /// Conversation JSON: a message array or `{ "messages": [...] }`
        input: PathBuf,
        /// Directory holding image assets named `<assetId>.<ext>`
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Resize mode for assistant images (default: openai-low-res)
        #[arg(long, value_parser = parse_resize)]
        model_resize: Option<ResizeSetting>,
        /// Resize mode for user images (default: none)
        #[arg(long, value_parser = parse_resize)]
        user_resize: Option<ResizeSetting>,
        /// Pretty-print the request
        #[arg(long)]
        pretty: bool,
    },
    /// Show the turns and dropped elements of a conversion
    Inspect {
        input: PathBuf,
        #[arg(long)]
        assets: Option<PathBuf>,
    },
    /// Resize a single image file with a named mode
    Resize {
        image: PathBuf,
        #[arg(short, long, value_parser = parse_mode)]
        mode: ResizeMode,
        /// Target mime type (default: image/webp)
        #[arg(long)]
        target: Option<String>,
        /// Write the resized image here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
