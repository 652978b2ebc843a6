use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::render::colormap::Colormap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub figure: FigureConfig,
    pub colormap: Colormap,
    pub playback: PlaybackConfig,
    pub preview_path: PathBuf,
    pub time_precision: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure: FigureConfig::default(),
            colormap: Colormap::default(),
            playback: PlaybackConfig::default(),
            preview_path: PathBuf::from("preview.png"),
            time_precision: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Used when no panel carries a non-zero interval hint.
    pub default_interval_ms: u64,
    pub repeat_delay_ms: u64,
    pub loops: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 16,
            repeat_delay_ms: 2000,
            loops: 1,
        }
    }
}
