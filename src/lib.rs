// Line-plot and panel-video stream reader
// Main library entry point

pub mod app;
pub mod cli;
pub mod core;
pub mod models;
pub mod render;
pub mod utils;

// Re-export main types
pub use crate::core::constants::ElementWidth;
pub use crate::core::cursor::ByteCursor;
pub use crate::core::error::{PlotError, Result};
pub use crate::core::format::{AxisMetadata, Frame, LinePlot, LineSeries, Panel, PanelMetadata, Shape, VideoDocument};
pub use crate::core::line_plot::{decode_line_plot, decode_line_plot_bytes};
pub use crate::core::sync::{frames, Frames, SynchronizedFrame};
pub use crate::core::video::{decode_video, decode_video_bytes};
pub use crate::render::{render, CanvasId, RenderOptions, Surface, Tool};

#[cfg(test)]
mod tests {
    #[test]
    fn test_width_tags() {
        use crate::core::constants::*;
        assert_eq!(ElementWidth::from_u8(WIDTH_TAG_F32), Some(ElementWidth::F32));
        assert_eq!(ElementWidth::from_u8(WIDTH_TAG_F64), Some(ElementWidth::F64));
        assert_eq!(ElementWidth::from_u8(2), None);
        assert_eq!(ElementWidth::F32.size(), 4);
    }
}
