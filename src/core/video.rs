// Multi-panel video stream decoder

use crate::core::constants::{ElementWidth, SPATIAL_SCALE_LEN};
use crate::core::cursor::ByteCursor;
use crate::core::error::{PlotError, Result};
use crate::core::format::*;
use crate::core::line_plot::read_axis_metadata;
use std::collections::HashMap;
use tracing::debug;

fn read_named_scalars(cursor: &mut ByteCursor<'_>) -> Result<HashMap<String, f64>> {
    let count = cursor.read_u64()?;

    let mut scalars = HashMap::new();
    for _ in 0..count {
        let name = cursor.read_string()?;
        let value = cursor.read_tagged_float()?;
        scalars.insert(name, value);
    }

    Ok(scalars)
}

fn read_shape(cursor: &mut ByteCursor<'_>) -> Result<Shape> {
    let rows = cursor.read_i64()?;
    let cols = cursor.read_i64()?;

    match (usize::try_from(rows), usize::try_from(cols)) {
        (Ok(r), Ok(c)) => Ok(Shape::new(r, c)),
        _ => Err(PlotError::InvalidShape { rows, cols }),
    }
}

fn read_panel(cursor: &mut ByteCursor<'_>) -> Result<Panel> {
    let value_width = cursor.read_element_width()?;
    let spatial_width = cursor.read_element_width()?;

    let sub_title = cursor.read_string()?;

    let scale = cursor.read_float_array(spatial_width, SPATIAL_SCALE_LEN)?;
    let spatial_scale = (scale[0], scale[1]);

    let shape = read_shape(cursor)?;
    let frame_interval_hint = cursor.read_u32()?;
    let frame_count = cursor.read_u64()?;

    // Frames of an empty shape cannot be split apart.
    if shape.is_empty() && frame_count > 0 {
        return Err(PlotError::InvalidShape {
            rows: shape.rows as i64,
            cols: shape.cols as i64,
        });
    }

    let frames = read_frames(cursor, value_width, shape, frame_count)?;

    debug!(
        "panel '{}': {}x{}, {} frames, interval {} ms",
        sub_title, shape.rows, shape.cols, frame_count, frame_interval_hint
    );

    Ok(Panel {
        metadata: PanelMetadata {
            sub_title,
            spatial_scale,
            shape,
            frame_interval_hint,
            frame_count,
        },
        frames,
    })
}

/// Reads `frame_count` row-major frames in one block and splits them by shape.
fn read_frames(
    cursor: &mut ByteCursor<'_>,
    width: ElementWidth,
    shape: Shape,
    frame_count: u64,
) -> Result<Vec<Frame>> {
    let total = (shape.rows as u64)
        .checked_mul(shape.cols as u64)
        .and_then(|per_frame| per_frame.checked_mul(frame_count))
        .ok_or(PlotError::TruncatedStream {
            offset: cursor.position(),
            needed: u64::MAX,
            available: cursor.remaining(),
        })?;

    let values = cursor.read_float_array(width, total)?;
    if shape.is_empty() {
        return Ok(Vec::new());
    }

    // `values` holds exactly frame_count * shape.len() elements here.
    let frames = values
        .chunks_exact(shape.len())
        .filter_map(|chunk| Frame::from_shape_vec(shape, chunk.to_vec()))
        .collect();

    Ok(frames)
}

/// Decodes a complete multi-panel video document, including the shared time
/// axis that follows the last panel.
pub fn decode_video(cursor: &mut ByteCursor<'_>) -> Result<VideoDocument> {
    let panel_count = cursor.read_u64()?;
    let axes = read_axis_metadata(cursor)?;
    let named_scalars = read_named_scalars(cursor)?;

    let mut panels = Vec::with_capacity(panel_count.min(64) as usize);
    for _ in 0..panel_count {
        panels.push(read_panel(cursor)?);
    }

    let max_frames = panels
        .iter()
        .map(|p| p.metadata.frame_count)
        .max()
        .unwrap_or(0);
    let shared_time = cursor.read_float_array(ElementWidth::F64, max_frames)?;

    debug!(
        "decoded video '{}': {} panels, {} scalars, {} global frames, {} trailing bytes",
        axes.title,
        panels.len(),
        named_scalars.len(),
        max_frames,
        cursor.remaining()
    );

    Ok(VideoDocument {
        axes,
        named_scalars,
        panels,
        shared_time,
    })
}

pub fn decode_video_bytes(data: &[u8]) -> Result<VideoDocument> {
    decode_video(&mut ByteCursor::new(data))
}
