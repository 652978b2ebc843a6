// Command-line surface for the line and video tools

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::error::{PlotError, Result};
use crate::render::Tool;
use crate::utils::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "fieldplot", version, about = "Render line plots and multi-panel field videos from simulation output")]
pub struct Cli {
    /// JSON render config (defaults to ./fieldplot.json when present)
    #[arg(long, global = true, env = "FIELDPLOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plot labelled line series
    Line(LineArgs),
    /// Animate synchronised panels
    Video(VideoArgs),
    /// Decode a stream and print a JSON summary
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct LineArgs {
    pub filepath: PathBuf,

    /// Save the plot instead of writing the preview
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VideoArgs {
    pub filepath: PathBuf,

    /// Save the animation to this path
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Save the animation next to the input as .gif
    #[arg(short = 'o')]
    pub save_beside: bool,

    /// Play the animation on the preview image
    #[arg(short = 's')]
    pub show: bool,
}

impl VideoArgs {
    pub fn save_path(&self) -> Option<PathBuf> {
        self.out_dir
            .clone()
            .or_else(|| self.save_beside.then(|| self.filepath.with_extension("gif")))
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(value_enum)]
    pub kind: Tool,

    pub filepath: PathBuf,
}

/// Wrong arity surfaces as [`PlotError::ArgumentCount`]; help, version and
/// other usage errors as [`PlotError::Usage`].
pub fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(PlotError::from)
}
