// Data structures decoded from line-plot and panel-video streams

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisMetadata {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale_kind: String,
    pub y_scale_kind: String,
}

impl Default for AxisMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_scale_kind: "linear".to_string(),
            y_scale_kind: "linear".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub color: String,
    pub line_style: String,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
}

impl LineSeries {
    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }
}

/// Series share one set of axes; series order is legend order.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    pub axes: AxisMetadata,
    pub series: Vec<LineSeries>,
}

/// Frame dimensions, both non-negative once decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Element count, saturating at `usize::MAX` for shapes no buffer could
    /// hold.
    pub fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelMetadata {
    pub sub_title: String,
    pub spatial_scale: (f64, f64),
    pub shape: Shape,
    pub frame_interval_hint: u32,
    pub frame_count: u64,
}

/// One row-major 2D frame. Indexing yields a row slice, so
/// `frame[row][col]` reads a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    shape: Shape,
    values: Vec<f64>,
}

impl Frame {
    /// Returns `None` if `values` does not hold exactly `shape.len()` elements.
    pub fn from_shape_vec(shape: Shape, values: Vec<f64>) -> Option<Self> {
        (values.len() == shape.len()).then_some(Self { shape, values })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.shape.cols;
        &self.values[start..start + self.shape.cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.shape.rows).map(move |r| self.row(r))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.shape.rows && col < self.shape.cols {
            Some(self.values[row * self.shape.cols + col])
        } else {
            None
        }
    }
}

impl Index<usize> for Frame {
    type Output = [f64];

    fn index(&self, row: usize) -> &[f64] {
        self.row(row)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub metadata: PanelMetadata,
    pub frames: Vec<Frame>,
}

impl Panel {
    /// Frame at a global index, `None` past this panel's recording.
    pub fn frame_at(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoDocument {
    pub axes: AxisMetadata,
    pub named_scalars: HashMap<String, f64>,
    pub panels: Vec<Panel>,
    pub shared_time: Vec<f64>,
}

impl VideoDocument {
    /// Length of the shared timeline, 0 when there are no panels.
    pub fn max_frame_count(&self) -> usize {
        self.panels
            .iter()
            .map(Panel::frame_count)
            .max()
            .unwrap_or(0)
    }

    pub fn time_at(&self, index: usize) -> Option<f64> {
        self.shared_time.get(index).copied()
    }

    /// Smallest non-zero interval hint across panels, in milliseconds.
    pub fn interval_hint_ms(&self) -> Option<u32> {
        self.panels
            .iter()
            .map(|p| p.metadata.frame_interval_hint)
            .filter(|&hint| hint > 0)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_indexing_is_row_major() {
        let frame = Frame::from_shape_vec(Shape::new(2, 3), vec![0., 1., 2., 3., 4., 5.]).unwrap();
        assert_eq!(frame[0], [0., 1., 2.]);
        assert_eq!(frame[1][2], 5.);
        assert_eq!(frame.get(1, 0), Some(3.));
        assert_eq!(frame.get(2, 0), None);
        assert_eq!(frame.rows().count(), 2);
    }

    #[test]
    fn test_frame_rejects_mismatched_len() {
        assert!(Frame::from_shape_vec(Shape::new(2, 2), vec![1., 2., 3.]).is_none());
        assert!(Frame::from_shape_vec(Shape::new(0, 4), Vec::new()).is_some());
    }

    #[test]
    fn test_oversized_shape_saturates() {
        let shape = Shape::new(1 << 40, 1 << 40);
        assert_eq!(shape.len(), usize::MAX);
        assert!(!shape.is_empty());
        assert!(Shape::new(usize::MAX, 0).is_empty());
    }

    #[test]
    fn test_empty_document_has_no_frames() {
        let doc = VideoDocument {
            axes: AxisMetadata::default(),
            named_scalars: HashMap::new(),
            panels: Vec::new(),
            shared_time: Vec::new(),
        };
        assert_eq!(doc.max_frame_count(), 0);
        assert_eq!(doc.interval_hint_ms(), None);
        assert_eq!(doc.time_at(0), None);
    }
}
