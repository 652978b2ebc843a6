//! Rendering surfaces and the drivers that feed them decoded documents.

pub mod color;
pub mod colormap;
pub mod driver;
pub mod player;
pub mod raster;

#[cfg(test)]
pub(crate) mod recording;

use crate::core::error::Result;
use crate::core::format::{AxisMetadata, Frame, LinePlot, Shape, VideoDocument};
use crate::core::line_plot::decode_line_plot_bytes;
use crate::core::video::decode_video_bytes;
use std::path::{Path, PathBuf};
use tracing::info;

pub use driver::{render_line_plot, VideoDriver};

/// Handle to an image canvas created on a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(pub usize);

/// Drawing capability the drivers render into.
///
/// Drivers never decode and never inspect surface state; everything they
/// know about a document is passed in through these calls.
pub trait Surface {
    /// Figure title, axis labels and axis scale kinds.
    fn set_axes(&mut self, axes: &AxisMetadata);

    /// A reusable image handle sized to `shape`, with a colour bar.
    fn create_image_canvas(&mut self, shape: Shape, title: &str) -> CanvasId;

    /// Replace the pixel data shown by `canvas`.
    fn update_image(&mut self, canvas: CanvasId, frame: &Frame);

    /// One colour range shared by every canvas in `group`.
    fn set_value_range(&mut self, group: &[CanvasId], min: f64, max: f64);

    fn set_time_label(&mut self, text: &str);

    /// Called once a video frame is fully drawn.
    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }

    fn plot_line(&mut self, x: &[f64], y: &[f64], label: &str, color: &str, style: &str);

    fn show(&mut self) -> Result<()>;

    fn save(&mut self, path: &Path) -> Result<()>;
}

/// Which decoder a stream goes through. The two formats cannot be told apart
/// from their bytes, so the caller always picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tool {
    Line,
    Video,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Line(LinePlot),
    Video(VideoDocument),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub save_to: Option<PathBuf>,
    pub show: bool,
    /// Digits after the decimal point in the time label.
    pub time_precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            save_to: None,
            show: true,
            time_precision: 3,
        }
    }
}

pub fn decode(tool: Tool, data: &[u8]) -> Result<Document> {
    match tool {
        Tool::Line => decode_line_plot_bytes(data).map(Document::Line),
        Tool::Video => decode_video_bytes(data).map(Document::Video),
    }
}

pub fn render_document<S: Surface + ?Sized>(
    document: &Document,
    surface: &mut S,
    options: &RenderOptions,
) -> Result<()> {
    match document {
        Document::Line(plot) => {
            render_line_plot(plot, surface, options.show)?;
        }
        Document::Video(video) => {
            let driver = VideoDriver::new(video, surface, options.time_precision);
            let drawn = driver.draw_all(surface)?;
            info!("rendered {} frames across {} panels", drawn, video.panels.len());
            if options.show {
                surface.show()?;
            }
        }
    }

    if let Some(path) = &options.save_to {
        surface.save(path)?;
        info!("saved {}", path.display());
    }

    Ok(())
}

/// Decodes the whole stream, then renders it. A decode failure returns before
/// the surface sees a single call.
pub fn render<S: Surface + ?Sized>(
    tool: Tool,
    data: &[u8],
    surface: &mut S,
    options: &RenderOptions,
) -> Result<()> {
    let document = decode(tool, data)?;
    render_document(&document, surface, options)
}
