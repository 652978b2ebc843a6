// Line-plot stream decoder

use crate::core::constants::AXIS_STRING_COUNT;
use crate::core::cursor::ByteCursor;
use crate::core::error::Result;
use crate::core::format::{AxisMetadata, LinePlot, LineSeries};
use tracing::debug;

/// Axis header shared by both stream kinds.
pub(crate) fn read_axis_metadata(cursor: &mut ByteCursor<'_>) -> Result<AxisMetadata> {
    let mut fields: [String; AXIS_STRING_COUNT] = Default::default();
    for field in fields.iter_mut() {
        *field = cursor.read_string()?;
    }
    let [title, x_label, y_label, x_scale_kind, y_scale_kind] = fields;

    Ok(AxisMetadata {
        title,
        x_label,
        y_label,
        x_scale_kind,
        y_scale_kind,
    })
}

fn read_series(cursor: &mut ByteCursor<'_>) -> Result<LineSeries> {
    let label = cursor.read_string()?;
    let color = cursor.read_string()?;
    let line_style = cursor.read_string()?;

    let x_width = cursor.read_element_width()?;
    let y_width = cursor.read_element_width()?;

    let sample_count = cursor.read_u64()?;

    let x_values = cursor.read_float_array(x_width, sample_count)?;
    let y_values = cursor.read_float_array(y_width, sample_count)?;

    Ok(LineSeries {
        label,
        color,
        line_style,
        x_values,
        y_values,
    })
}

/// Decodes a complete line-plot document. Any failure discards everything
/// read so far.
pub fn decode_line_plot(cursor: &mut ByteCursor<'_>) -> Result<LinePlot> {
    let axes = read_axis_metadata(cursor)?;
    let series_count = cursor.read_u64()?;

    // The count is untrusted; let the stream bound the allocation.
    let mut series = Vec::with_capacity(series_count.min(1024) as usize);
    for _ in 0..series_count {
        series.push(read_series(cursor)?);
    }

    debug!(
        "decoded line plot '{}': {} series, {} trailing bytes",
        axes.title,
        series.len(),
        cursor.remaining()
    );

    Ok(LinePlot { axes, series })
}

/// Convenience wrapper over a whole in-memory stream.
pub fn decode_line_plot_bytes(data: &[u8]) -> Result<LinePlot> {
    decode_line_plot(&mut ByteCursor::new(data))
}
