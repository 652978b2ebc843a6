// Surface that records driver calls for assertions

use super::{CanvasId, Surface};
use crate::core::error::Result;
use crate::core::format::{AxisMetadata, Frame, Shape};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Axes(String),
    Canvas(Shape, String),
    Update(CanvasId, Vec<f64>),
    Range(Vec<CanvasId>, f64, f64),
    TimeLabel(String),
    EndFrame,
    Line { label: String, color: String, style: String, samples: usize },
    Show,
    Save(PathBuf),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    canvases: usize,
}

impl RecordingSurface {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn set_axes(&mut self, axes: &AxisMetadata) {
        self.calls.push(Call::Axes(axes.title.clone()));
    }

    fn create_image_canvas(&mut self, shape: Shape, title: &str) -> CanvasId {
        self.calls.push(Call::Canvas(shape, title.to_string()));
        self.canvases += 1;
        CanvasId(self.canvases - 1)
    }

    fn update_image(&mut self, canvas: CanvasId, frame: &Frame) {
        self.calls.push(Call::Update(canvas, frame.values().to_vec()));
    }

    fn set_value_range(&mut self, group: &[CanvasId], min: f64, max: f64) {
        self.calls.push(Call::Range(group.to_vec(), min, max));
    }

    fn set_time_label(&mut self, text: &str) {
        self.calls.push(Call::TimeLabel(text.to_string()));
    }

    fn end_frame(&mut self) -> Result<()> {
        self.calls.push(Call::EndFrame);
        Ok(())
    }

    fn plot_line(&mut self, x: &[f64], _y: &[f64], label: &str, color: &str, style: &str) {
        self.calls.push(Call::Line {
            label: label.to_string(),
            color: color.to_string(),
            style: style.to_string(),
            samples: x.len(),
        });
    }

    fn show(&mut self) -> Result<()> {
        self.calls.push(Call::Show);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.calls.push(Call::Save(path.to_path_buf()));
        Ok(())
    }
}
