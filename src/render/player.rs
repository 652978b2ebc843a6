// Timer-driven video playback

use super::{Surface, VideoDriver};
use crate::core::error::Result;
use crate::core::format::VideoDocument;
use crate::models::config_model::PlaybackConfig;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info};

/// Drives a [`VideoDriver`] one frame per tick, showing the surface after
/// each frame. Dropping the `play` future stops playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub interval: Duration,
    pub repeat_delay: Duration,
    pub loops: u32,
}

impl Player {
    /// Uses the smallest non-zero panel interval hint, else the configured
    /// default.
    pub fn for_video(video: &VideoDocument, config: &PlaybackConfig) -> Self {
        let interval_ms = video
            .interval_hint_ms()
            .map(u64::from)
            .unwrap_or(config.default_interval_ms)
            .max(1);

        Self {
            interval: Duration::from_millis(interval_ms),
            repeat_delay: Duration::from_millis(config.repeat_delay_ms),
            loops: config.loops,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        u32::try_from(self.interval.as_millis()).unwrap_or(u32::MAX)
    }

    /// Plays `loops` passes over the timeline. Returns the number of frames
    /// drawn.
    pub async fn play<S: Surface + ?Sized>(
        &self,
        driver: &VideoDriver<'_>,
        surface: &mut S,
    ) -> Result<usize> {
        let total = driver.frame_count();
        if total == 0 {
            info!("nothing to play: video has no frames");
            return Ok(0);
        }

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut drawn = 0;
        for pass in 0..self.loops {
            if pass > 0 {
                sleep(self.repeat_delay).await;
                ticker.reset();
            }
            debug!("playback pass {} of {}", pass + 1, self.loops);

            for index in 0..total {
                ticker.tick().await;
                if driver.draw_frame(surface, index)? {
                    surface.show()?;
                    drawn += 1;
                }
            }
        }

        Ok(drawn)
    }
}
