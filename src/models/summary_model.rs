use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::format::{AxisMetadata, LinePlot, LineSeries, Panel, Shape, VideoDocument};
use crate::core::sync::value_range;

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, Serialize)]
pub struct SeriesSummary {
    pub label: String,
    pub color: String,
    pub line_style: String,
    pub samples: usize,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

impl From<&LineSeries> for SeriesSummary {
    fn from(series: &LineSeries) -> Self {
        Self {
            label: series.label.clone(),
            color: series.color.clone(),
            line_style: series.line_style.clone(),
            samples: series.len(),
            x_range: finite_range(&series.x_values),
            y_range: finite_range(&series.y_values),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinePlotSummary {
    pub axes: AxisMetadata,
    pub series: Vec<SeriesSummary>,
}

impl From<&LinePlot> for LinePlotSummary {
    fn from(plot: &LinePlot) -> Self {
        Self {
            axes: plot.axes.clone(),
            series: plot.series.iter().map(SeriesSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PanelSummary {
    pub sub_title: String,
    pub shape: Shape,
    pub spatial_scale: (f64, f64),
    pub frame_interval_hint: u32,
    pub frame_count: u64,
    /// Over every frame of the panel.
    pub value_range: Option<(f64, f64)>,
}

impl From<&Panel> for PanelSummary {
    fn from(panel: &Panel) -> Self {
        let (lo, hi) = value_range(&panel.frames);
        Self {
            sub_title: panel.metadata.sub_title.clone(),
            shape: panel.metadata.shape,
            spatial_scale: panel.metadata.spatial_scale,
            frame_interval_hint: panel.metadata.frame_interval_hint,
            frame_count: panel.metadata.frame_count,
            value_range: (lo <= hi).then_some((lo, hi)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoSummary {
    pub axes: AxisMetadata,
    pub named_scalars: BTreeMap<String, f64>,
    pub panels: Vec<PanelSummary>,
    pub global_frames: usize,
    pub time_span: Option<(f64, f64)>,
}

impl From<&VideoDocument> for VideoSummary {
    fn from(video: &VideoDocument) -> Self {
        Self {
            axes: video.axes.clone(),
            named_scalars: video
                .named_scalars
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            panels: video.panels.iter().map(PanelSummary::from).collect(),
            global_frames: video.max_frame_count(),
            time_span: match (video.shared_time.first(), video.shared_time.last()) {
                (Some(first), Some(last)) => Some((*first, *last)),
                _ => None,
            },
        }
    }
}
