use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

mod platform;

/// Terminal client for the video clipping backend.
#[derive(Debug, Parser)]
#[command(name = "clipper", version, about)]
pub struct Cli {
    /// Configuration file (RON).
    #[arg(long, global = true, default_value = "clipper.ron")]
    pub config: PathBuf,

    /// Backend base url; overrides the configuration file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Delay between job status polls, in milliseconds.
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the whole download/analyze/clip pipeline and follow its progress.
    FullAuto(FullAutoArgs),
    /// Submit one of the single-step forms.
    Action(ActionArgs),
    /// Browse the server's files and print the chosen path.
    Browse(BrowseArgs),
    /// Ask the server to reveal its output folder.
    OpenFolder,
}

#[derive(Debug, Args)]
pub struct FullAutoArgs {
    #[arg(long)]
    pub url: String,
    #[arg(long, default_value = "")]
    pub api_key: String,
    #[arg(long, default_value = "gemini-2.5-flash")]
    pub model: String,
    #[arg(long, default_value = "")]
    pub watermark: String,
    #[arg(long)]
    pub burn_subtitle: bool,
    /// `ai` or `replayed`.
    #[arg(long, default_value = "ai")]
    pub analysis_method: String,
}

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// download, download-sub, analyze, auto-clip, clip, extract or burn.
    pub form: String,
    /// Field assignment, e.g. `--set start=00:01:05`.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
    /// Pick a field's value from the server's files, e.g. `--pick video:.mp4,.webm`.
    #[arg(long, value_name = "FIELD[:EXTS]")]
    pub pick: Option<String>,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    #[arg(long, default_value = "clip")]
    pub form: String,
    #[arg(long, default_value = "video")]
    pub field: String,
    /// Comma separated extensions to emphasise, e.g. `.mp4,.webm`.
    #[arg(long)]
    pub filter: Option<String>,
    /// Write the file panel as HTML to this path after every listing.
    #[arg(long)]
    pub html: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    platform::run(Cli::parse())
}
