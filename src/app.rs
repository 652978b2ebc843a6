// Tool entry points: read a stream, decode it, hand it to a surface

use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::cli::{Cli, Command, InspectArgs, LineArgs, VideoArgs};
use crate::core::error::Result;
use crate::core::video::decode_video_bytes;
use crate::models::config_model::RenderConfig;
use crate::models::summary_model::{LinePlotSummary, VideoSummary};
use crate::render::player::Player;
use crate::render::raster::RasterSurface;
use crate::render::{decode, render_document, Document, RenderOptions, Surface, Tool, VideoDriver};

/// The whole stream is read up front; decoding never touches the file.
pub async fn read_stream(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).await?;
    info!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

pub async fn run_line(args: &LineArgs, config: &RenderConfig) -> Result<()> {
    let data = read_stream(&args.filepath).await?;
    let document = decode(Tool::Line, &data)?;

    let mut surface = RasterSurface::from_config(config);
    let options = RenderOptions {
        save_to: args.out.clone(),
        show: args.out.is_none(),
        time_precision: config.time_precision,
    };
    render_document(&document, &mut surface, &options)
}

pub async fn run_video(args: &VideoArgs, config: &RenderConfig) -> Result<()> {
    let data = read_stream(&args.filepath).await?;
    let video = decode_video_bytes(&data)?;

    for (name, value) in &video.named_scalars {
        info!("{} = {}", name, value);
    }

    let player = Player::for_video(&video, &config.playback);
    let save_to = args.save_path();

    if save_to.is_none() && !args.show {
        warn!("nothing to do: pass --out-dir, -o or -s");
        return Ok(());
    }

    if let Some(path) = save_to {
        let mut surface = RasterSurface::from_config(config);
        surface.set_recording(true);
        surface.set_frame_delay_ms(player.interval_ms());

        let driver = VideoDriver::new(&video, &mut surface, config.time_precision);
        let drawn = driver.draw_all(&mut surface)?;
        surface.save(&path)?;
        info!("saved {} frames to {}", drawn, path.display());
    }

    if args.show {
        let mut surface = RasterSurface::from_config(config);
        let driver = VideoDriver::new(&video, &mut surface, config.time_precision);
        let drawn = player.play(&driver, &mut surface).await?;
        info!("played {} frames at {:?} per frame", drawn, player.interval);
    }

    Ok(())
}

/// Decoded summary as pretty JSON.
pub async fn run_inspect(args: &InspectArgs) -> Result<String> {
    let data = read_stream(&args.filepath).await?;

    let json = match decode(args.kind, &data)? {
        Document::Line(plot) => serde_json::to_string_pretty(&LinePlotSummary::from(&plot))?,
        Document::Video(video) => serde_json::to_string_pretty(&VideoSummary::from(&video))?,
    };
    Ok(json)
}

pub async fn run(cli: &Cli, config: &RenderConfig) -> Result<()> {
    match &cli.command {
        Command::Line(args) => run_line(args, config).await,
        Command::Video(args) => run_video(args, config).await,
        Command::Inspect(args) => {
            let json = run_inspect(args).await?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Renders into any surface, for callers that bring their own.
pub async fn render_file<S: Surface + ?Sized>(
    tool: Tool,
    path: &Path,
    surface: &mut S,
    options: &RenderOptions,
) -> Result<()> {
    let data = read_stream(path).await?;
    crate::render::render(tool, &data, surface, options)
}
