// Walks decoded documents and issues surface calls

use super::{CanvasId, Surface};
use crate::core::error::Result;
use crate::core::format::{LinePlot, VideoDocument};
use crate::core::sync::{Frames, SynchronizedFrame};
use tracing::{debug, warn};

/// One `plot_line` per series in stream order, then `show` when asked.
pub fn render_line_plot<S: Surface + ?Sized>(
    plot: &LinePlot,
    surface: &mut S,
    show: bool,
) -> Result<()> {
    surface.set_axes(&plot.axes);

    for series in &plot.series {
        if series.x_values.len() != series.y_values.len() {
            warn!(
                "series '{}' has {} x values but {} y values",
                series.label,
                series.x_values.len(),
                series.y_values.len()
            );
        }
        surface.plot_line(
            &series.x_values,
            &series.y_values,
            &series.label,
            &series.color,
            &series.line_style,
        );
    }

    if show {
        surface.show()?;
    }
    Ok(())
}

/// Per-frame video renderer. Owns one canvas per panel, created up front, and
/// draws any global frame index on request so an external timer can drive it.
#[derive(Debug, Clone)]
pub struct VideoDriver<'a> {
    video: &'a VideoDocument,
    frames: Frames<'a>,
    canvases: Vec<CanvasId>,
    time_precision: usize,
}

impl<'a> VideoDriver<'a> {
    pub fn new<S: Surface + ?Sized>(
        video: &'a VideoDocument,
        surface: &mut S,
        time_precision: usize,
    ) -> Self {
        surface.set_axes(&video.axes);

        let canvases = video
            .panels
            .iter()
            .map(|p| surface.create_image_canvas(p.metadata.shape, &p.metadata.sub_title))
            .collect();

        Self {
            video,
            frames: video.frames(),
            canvases,
            time_precision,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.total()
    }

    pub fn canvases(&self) -> &[CanvasId] {
        &self.canvases
    }

    pub fn time_label(&self, global_index: usize) -> String {
        let time = self.video.time_at(global_index).unwrap_or(f64::NAN);
        format!("Time = {:.*}", self.time_precision, time)
    }

    fn apply<S: Surface + ?Sized>(&self, surface: &mut S, frame: &SynchronizedFrame<'_>) -> Result<()> {
        for (panel, data) in &frame.active_panels {
            surface.update_image(self.canvases[*panel], data);
        }
        surface.set_value_range(&self.canvases, frame.value_min, frame.value_max);
        surface.set_time_label(&self.time_label(frame.global_index));
        surface.end_frame()
    }

    /// Draws one global frame. Returns `false` when the index is past the end
    /// of the timeline.
    pub fn draw_frame<S: Surface + ?Sized>(&self, surface: &mut S, global_index: usize) -> Result<bool> {
        match self.frames.at(global_index) {
            Some(frame) => {
                debug!(
                    "frame {}: {} active panels, range [{}, {}]",
                    global_index,
                    frame.active_panels.len(),
                    frame.value_min,
                    frame.value_max
                );
                self.apply(surface, &frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Draws the whole timeline in order and returns the number of frames.
    pub fn draw_all<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<usize> {
        let mut drawn = 0;
        for frame in self.frames.clone() {
            self.apply(surface, &frame)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}
