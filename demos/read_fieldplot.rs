// Example usage of the video decoder and frame synchronizer

use fieldplot::{decode_video_bytes, Result};
use tracing::{debug, info, Level};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/phi.bin".to_string());
    let data = std::fs::read(&path)?;
    let video = decode_video_bytes(&data)?;

    info!("{}: {}", path, video.axes.title);
    for (name, value) in &video.named_scalars {
        info!("  {} = {}", name, value);
    }

    for panel in &video.panels {
        info!(
            "  panel '{}' {}x{}, {} frames",
            panel.metadata.sub_title,
            panel.metadata.shape.rows,
            panel.metadata.shape.cols,
            panel.frame_count()
        );
    }

    for frame in video.frames() {
        let (lo, hi) = frame.value_range();
        debug!(
            "frame {} t={:?}: {} active, range [{}, {}]",
            frame.global_index,
            video.time_at(frame.global_index),
            frame.active_panels.len(),
            lo,
            hi
        );
    }
    info!("Total frames: {}", video.max_frame_count());

    Ok(())
}
