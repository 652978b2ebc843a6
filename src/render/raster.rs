//! Headless [`Surface`] that rasterises into RGBA images.
//!
//! Panels are laid out left to right, each drawn with its first row at the
//! bottom and a colour bar on its right. Line plots are drawn into a single
//! framed plot area with a dotted grid. Text (titles, labels, legend, time) is
//! tracked but not rasterised.

use super::color::{parse_color, LineStyle, BLACK, GRID, WHITE};
use super::colormap::{Colormap, Normalize};
use super::{CanvasId, Surface};
use crate::core::error::Result;
use crate::core::format::{AxisMetadata, Frame, Shape};
use crate::models::config_model::RenderConfig;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone)]
struct ImageCanvas {
    shape: Shape,
    title: String,
    values: Vec<f64>,
    norm: Normalize,
}

#[derive(Debug, Clone)]
struct PlotLine {
    x: Vec<f64>,
    y: Vec<f64>,
    label: String,
    color: Rgba<u8>,
    style: LineStyle,
}

pub struct RasterSurface {
    width: u32,
    height: u32,
    colormap: Colormap,
    axes: AxisMetadata,
    canvases: Vec<ImageCanvas>,
    lines: Vec<PlotLine>,
    time_label: String,
    recording: bool,
    recorded: Vec<RgbaImage>,
    frame_delay_ms: u32,
    preview_path: PathBuf,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            colormap: Colormap::default(),
            axes: AxisMetadata::default(),
            canvases: Vec::new(),
            lines: Vec::new(),
            time_label: String::new(),
            recording: false,
            recorded: Vec::new(),
            frame_delay_ms: 16,
            preview_path: PathBuf::from("preview.png"),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        let mut surface = Self::new(config.figure.width, config.figure.height);
        surface.colormap = config.colormap;
        surface.frame_delay_ms = u32::try_from(config.playback.default_interval_ms).unwrap_or(u32::MAX);
        surface.preview_path = config.preview_path.clone();
        surface
    }

    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn with_preview_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preview_path = path.into();
        self
    }

    /// Keep a composite of every finished frame for animated output.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn set_frame_delay_ms(&mut self, delay_ms: u32) {
        self.frame_delay_ms = delay_ms;
    }

    pub fn recorded_frames(&self) -> usize {
        self.recorded.len()
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    pub fn axes(&self) -> &AxisMetadata {
        &self.axes
    }

    pub fn legend(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.label.as_str()).collect()
    }

    pub fn canvas_titles(&self) -> Vec<&str> {
        self.canvases.iter().map(|c| c.title.as_str()).collect()
    }

    /// Renders the current state into a fresh image.
    pub fn compose(&self) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(self.width, self.height, WHITE);
        if !self.canvases.is_empty() {
            self.draw_panels(&mut img);
        } else {
            self.draw_lines(&mut img);
        }
        img
    }

    // ---- image panels ----

    fn draw_panels(&self, img: &mut RgbaImage) {
        let slots = panel_slots(self.width, self.height, self.canvases.len());

        for (canvas, slot) in self.canvases.iter().zip(slots) {
            let Some((area, bar)) = fit_panel(slot, canvas.shape) else {
                continue;
            };

            let Shape { rows, cols } = canvas.shape;
            for py in 0..area.h {
                // origin at the lower left
                let row = rows - 1 - scale_index(py, area.h, rows);
                for px in 0..area.w {
                    let col = scale_index(px, area.w, cols);
                    let color = row
                        .checked_mul(cols)
                        .and_then(|start| start.checked_add(col))
                        .and_then(|i| canvas.values.get(i))
                        .and_then(|&v| canvas.norm.apply(v))
                        .map(|t| self.colormap.color_at(t))
                        .unwrap_or(WHITE);
                    img.put_pixel(area.x + px, area.y + py, color);
                }
            }

            for py in 0..bar.h {
                let t = if bar.h > 1 {
                    1.0 - py as f64 / (bar.h - 1) as f64
                } else {
                    0.5
                };
                let color = self.colormap.color_at(t);
                for px in 0..bar.w {
                    img.put_pixel(bar.x + px, bar.y + py, color);
                }
            }

            draw_frame_rect(img, area);
            draw_frame_rect(img, bar);
        }
    }

    // ---- line plots ----

    fn draw_lines(&self, img: &mut RgbaImage) {
        let area = plot_area(self.width, self.height);

        let x_map = AxisMap::fit(
            self.lines.iter().flat_map(|l| l.x.iter().copied()),
            is_log_scale(&self.axes.x_scale_kind),
            area.x as f64,
            area.right() as f64,
        );
        let y_map = AxisMap::fit(
            self.lines.iter().flat_map(|l| l.y.iter().copied()),
            is_log_scale(&self.axes.y_scale_kind),
            area.bottom() as f64,
            area.y as f64,
        );

        // Dotted grid at fifths of the plot area, like `grid(True, ls=":")`.
        let grid = LineStyle::Dashed(vec![2, 4]);
        for i in 1..5 {
            let gx = (area.x + area.w * i / 5) as f64;
            let gy = (area.y + area.h * i / 5) as f64;
            let mut step = 0;
            draw_segment(img, (gx, area.y as f64), (gx, area.bottom() as f64), GRID, &grid, &mut step, false);
            step = 0;
            draw_segment(img, (area.x as f64, gy), (area.right() as f64, gy), GRID, &grid, &mut step, false);
        }

        for line in &self.lines {
            if line.style == LineStyle::Hidden {
                continue;
            }

            let points: Vec<Option<(f64, f64)>> = line
                .x
                .iter()
                .zip(&line.y)
                .map(|(&x, &y)| Some((x_map.map(x)?, y_map.map(y)?)))
                .collect();

            let mut step = 0;
            for pair in points.windows(2) {
                if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                    draw_segment(img, a, b, line.color, &line.style, &mut step, true);
                }
            }
        }

        draw_frame_rect(img, area);
    }

    // ---- output ----

    fn save_gif(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = GifEncoder::new(file);
        encoder.set_repeat(Repeat::Infinite)?;

        let delay = Delay::from_numer_denom_ms(self.frame_delay_ms, 1);
        for frame in &self.recorded {
            encoder.encode_frame(image::Frame::from_parts(frame.clone(), 0, 0, delay))?;
        }

        info!("wrote {} frames to {}", self.recorded.len(), path.display());
        Ok(())
    }

    fn save_sequence(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;

        if self.recorded.is_empty() {
            self.compose().save(dir.join("frame_0000.png"))?;
            return Ok(());
        }

        for (i, frame) in self.recorded.iter().enumerate() {
            frame.save(dir.join(format!("frame_{i:04}.png")))?;
        }

        info!("wrote {} frames to {}", self.recorded.len(), dir.display());
        Ok(())
    }
}

impl Surface for RasterSurface {
    fn set_axes(&mut self, axes: &AxisMetadata) {
        self.axes = axes.clone();
    }

    fn create_image_canvas(&mut self, shape: Shape, title: &str) -> CanvasId {
        // Storage arrives with the first update; until then the canvas is blank.
        self.canvases.push(ImageCanvas {
            shape,
            title: title.to_string(),
            values: Vec::new(),
            norm: Normalize::default(),
        });
        CanvasId(self.canvases.len() - 1)
    }

    fn update_image(&mut self, canvas: CanvasId, frame: &Frame) {
        match self.canvases.get_mut(canvas.0) {
            Some(target) if target.shape == frame.shape() => {
                target.values.clear();
                target.values.extend_from_slice(frame.values());
            }
            Some(target) => warn!(
                "frame shape {:?} does not match canvas '{}' ({:?})",
                frame.shape(),
                target.title,
                target.shape
            ),
            None => warn!("update for unknown canvas {:?}", canvas),
        }
    }

    fn set_value_range(&mut self, group: &[CanvasId], min: f64, max: f64) {
        for id in group {
            if let Some(canvas) = self.canvases.get_mut(id.0) {
                canvas.norm = Normalize::new(min, max);
            }
        }
    }

    fn set_time_label(&mut self, text: &str) {
        self.time_label = text.to_string();
    }

    fn end_frame(&mut self) -> Result<()> {
        if self.recording {
            self.recorded.push(self.compose());
        }
        Ok(())
    }

    fn plot_line(&mut self, x: &[f64], y: &[f64], label: &str, color: &str, style: &str) {
        let color = parse_color(color).unwrap_or_else(|| {
            warn!("unrecognised colour '{}' for '{}', using black", color, label);
            BLACK
        });
        let style = LineStyle::parse(style).unwrap_or_else(|| {
            warn!("unrecognised line style '{}' for '{}', using solid", style, label);
            LineStyle::Solid
        });

        self.lines.push(PlotLine {
            x: x.to_vec(),
            y: y.to_vec(),
            label: label.to_string(),
            color,
            style,
        });
    }

    fn show(&mut self) -> Result<()> {
        self.compose().save(&self.preview_path)?;
        debug!("preview written to {}", self.preview_path.display());
        Ok(())
    }

    /// `.gif` with recorded frames writes an animation; a path without an
    /// extension becomes a directory of numbered PNG frames; anything else is
    /// a still of the current state in the format the extension names.
    fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("gif") if !self.recorded.is_empty() => self.save_gif(path),
            None => self.save_sequence(path),
            Some(_) => {
                self.compose().save(path)?;
                Ok(())
            }
        }
    }
}

// ---- layout ----

/// Equal-width slots for `count` panels across the figure.
pub fn panel_slots(width: u32, height: u32, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }

    let mx = width / 20;
    let my = height / 10;
    let usable = width.saturating_sub(2 * mx);
    let slot_w = usable / count as u32;

    (0..count as u32)
        .map(|i| Rect {
            x: mx + i * slot_w,
            y: my,
            w: slot_w,
            h: height.saturating_sub(2 * my),
        })
        .collect()
}

/// Image area with square cells and the colour bar beside it, or `None` when
/// there is nothing to draw.
pub fn fit_panel(slot: Rect, shape: Shape) -> Option<(Rect, Rect)> {
    if shape.is_empty() {
        return None;
    }

    let bar_w = (slot.w / 25).max(2);
    let gap = (slot.w / 50).max(1);
    let avail_w = slot.w.checked_sub(bar_w + 2 * gap)?;
    if avail_w == 0 || slot.h == 0 {
        return None;
    }

    let cell = (avail_w as f64 / shape.cols as f64).min(slot.h as f64 / shape.rows as f64);
    let w = ((shape.cols as f64 * cell).floor() as u32).clamp(1, avail_w);
    let h = ((shape.rows as f64 * cell).floor() as u32).clamp(1, slot.h);

    let area = Rect {
        x: slot.x + (avail_w - w) / 2,
        y: slot.y + (slot.h - h) / 2,
        w,
        h,
    };
    let bar = Rect {
        x: area.right() + gap,
        y: area.y,
        w: bar_w,
        h,
    };
    Some((area, bar))
}

/// Maps pixel `p` of `span` onto `0..len` without overflowing for huge shapes.
fn scale_index(p: u32, span: u32, len: usize) -> usize {
    (p as u128 * len as u128 / span as u128) as usize
}

fn plot_area(width: u32, height: u32) -> Rect {
    let x = width / 10;
    let y = height / 10;
    Rect {
        x,
        y,
        w: width.saturating_sub(x + width / 20).max(1),
        h: height.saturating_sub(2 * y).max(1),
    }
}

fn is_log_scale(kind: &str) -> bool {
    match kind {
        "linear" => false,
        "log" => true,
        other => {
            warn!("axis scale '{}' is drawn as linear", other);
            false
        }
    }
}

/// Data-to-pixel mapping along one axis.
#[derive(Debug, Clone, Copy)]
struct AxisMap {
    lo: f64,
    hi: f64,
    log: bool,
    p0: f64,
    p1: f64,
}

impl AxisMap {
    fn fit(values: impl Iterator<Item = f64>, log: bool, p0: f64, p1: f64) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in values {
            if let Some(t) = transform(v, log) {
                lo = lo.min(t);
                hi = hi.max(t);
            }
        }

        if lo > hi {
            (lo, hi) = (0.0, 1.0);
        } else if lo == hi {
            (lo, hi) = (lo - 0.5, hi + 0.5);
        }

        let pad = (hi - lo) * 0.05;
        Self {
            lo: lo - pad,
            hi: hi + pad,
            log,
            p0,
            p1,
        }
    }

    fn map(&self, v: f64) -> Option<f64> {
        let t = transform(v, self.log)?;
        Some(self.p0 + (t - self.lo) / (self.hi - self.lo) * (self.p1 - self.p0))
    }
}

fn transform(v: f64, log: bool) -> Option<f64> {
    if !v.is_finite() || (log && v <= 0.0) {
        return None;
    }
    Some(if log { v.log10() } else { v })
}

// ---- pixel helpers ----

fn put(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < img.width() as u64 && (y as u64) < img.height() as u64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_frame_rect(img: &mut RgbaImage, rect: Rect) {
    let (x0, y0) = (rect.x as i64 - 1, rect.y as i64 - 1);
    let (x1, y1) = (rect.right() as i64, rect.bottom() as i64);
    for x in x0..=x1 {
        put(img, x, y0, BLACK);
        put(img, x, y1, BLACK);
    }
    for y in y0..=y1 {
        put(img, x0, y, BLACK);
        put(img, x1, y, BLACK);
    }
}

/// Bresenham segment. `step` carries the dash phase across segments of one
/// polyline.
fn draw_segment(
    img: &mut RgbaImage,
    from: (f64, f64),
    to: (f64, f64),
    color: Rgba<u8>,
    style: &LineStyle,
    step: &mut u32,
    thick: bool,
) {
    let limit = 4.0 * (img.width().max(img.height()) as f64);
    let px = |v: f64| v.clamp(-limit, limit).round() as i64;

    let (mut x, mut y) = (px(from.0), px(from.1));
    let (x1, y1) = (px(to.0), px(to.1));

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if style.is_on(*step) {
            put(img, x, y, color);
            if thick {
                put(img, x + 1, y, color);
                put(img, x, y + 1, color);
                put(img, x + 1, y + 1, color);
            }
        }
        *step = step.wrapping_add(1);

        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_line_plot, VideoDriver};
    use crate::core::format::*;
    use std::collections::HashMap;

    fn one_panel_video() -> VideoDocument {
        let shape = Shape::new(2, 2);
        let frames = vec![
            Frame::from_shape_vec(shape, vec![0., 0., 0., 10.]).unwrap(),
            Frame::from_shape_vec(shape, vec![5., 5., 5., 5.]).unwrap(),
        ];
        VideoDocument {
            axes: AxisMetadata::default(),
            named_scalars: HashMap::new(),
            panels: vec![Panel {
                metadata: PanelMetadata {
                    sub_title: "phi".to_string(),
                    spatial_scale: (1.0, 1.0),
                    shape,
                    frame_interval_hint: 20,
                    frame_count: 2,
                },
                frames,
            }],
            shared_time: vec![0.0, 1.0],
        }
    }

    #[test]
    fn test_panel_slots_split_width() {
        let slots = panel_slots(200, 100, 2);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], Rect { x: 10, y: 10, w: 90, h: 80 });
        assert_eq!(slots[1].x, 100);
        assert!(panel_slots(200, 100, 0).is_empty());
    }

    #[test]
    fn test_fit_panel_keeps_square_cells() {
        let slot = Rect { x: 0, y: 0, w: 100, h: 50 };
        let (area, bar) = fit_panel(slot, Shape::new(2, 4)).unwrap();
        assert_eq!(area.w, 2 * area.h);
        assert!(bar.x >= area.right());
        assert_eq!(bar.h, area.h);
        assert!(fit_panel(slot, Shape::new(0, 4)).is_none());
    }

    #[test]
    fn test_origin_is_lower_left() {
        let doc = one_panel_video();
        let mut surface = RasterSurface::new(200, 100);
        let driver = VideoDriver::new(&doc, &mut surface, 3);
        driver.draw_frame(&mut surface, 0).unwrap();

        let img = surface.compose();
        let slot = panel_slots(200, 100, 1)[0];
        let (area, _) = fit_panel(slot, Shape::new(2, 2)).unwrap();

        // value 10 sits at row 1, col 1: top right once flipped
        let top_right = *img.get_pixel(area.right() - 1, area.y);
        let bottom_left = *img.get_pixel(area.x, area.bottom() - 1);
        assert_eq!(top_right, Colormap::Seismic.color_at(1.0));
        assert_eq!(bottom_left, Colormap::Seismic.color_at(0.0));
    }

    #[test]
    fn test_flat_frame_maps_to_midpoint() {
        let doc = one_panel_video();
        let mut surface = RasterSurface::new(200, 100);
        let driver = VideoDriver::new(&doc, &mut surface, 3);
        driver.draw_frame(&mut surface, 1).unwrap();

        let img = surface.compose();
        let (area, _) = fit_panel(panel_slots(200, 100, 1)[0], Shape::new(2, 2)).unwrap();
        assert_eq!(*img.get_pixel(area.x + 1, area.y + 1), Colormap::Seismic.color_at(0.5));
        assert_eq!(surface.time_label(), "Time = 1.000");
    }

    #[test]
    fn test_idle_oversized_panel_stays_blank() {
        use crate::core::test_stream::StreamBuilder;
        use crate::render::{render, RenderOptions, Tool};

        let data = StreamBuilder::new()
            .u64(1)
            .axes("", "", "", "linear", "linear")
            .u64(0)
            .panel("idle", 1 << 40, 1, 0, &[])
            .build();

        let mut surface = RasterSurface::new(200, 100);
        let options = RenderOptions {
            show: false,
            ..RenderOptions::default()
        };
        render(Tool::Video, &data, &mut surface, &options).unwrap();
        assert_eq!(surface.canvas_titles(), vec!["idle"]);

        let img = surface.compose();
        let (area, _) = fit_panel(panel_slots(200, 100, 1)[0], Shape::new(1 << 40, 1)).unwrap();
        assert_eq!(*img.get_pixel(area.x, area.y), WHITE);
    }

    #[test]
    fn test_recorded_gif_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let doc = one_panel_video();

        let mut surface = RasterSurface::new(60, 40);
        surface.set_recording(true);
        let driver = VideoDriver::new(&doc, &mut surface, 3);
        driver.draw_all(&mut surface).unwrap();
        assert_eq!(surface.recorded_frames(), 2);

        let gif = dir.path().join("anim.gif");
        surface.save(&gif).unwrap();
        let bytes = std::fs::read(&gif).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");

        let frames_dir = dir.path().join("frames");
        surface.save(&frames_dir).unwrap();
        assert!(frames_dir.join("frame_0000.png").exists());
        assert!(frames_dir.join("frame_0001.png").exists());
    }

    #[test]
    fn test_line_plot_draws_series_colour() {
        let dir = tempfile::tempdir().unwrap();
        let plot = LinePlot {
            axes: AxisMetadata::default(),
            series: vec![LineSeries {
                label: "T1".to_string(),
                color: "red".to_string(),
                line_style: "-".to_string(),
                x_values: vec![0.0, 1.0, 2.0],
                y_values: vec![10.0, 20.0, 15.0],
            }],
        };

        let mut surface = RasterSurface::new(120, 80).with_preview_path(dir.path().join("preview.png"));
        render_line_plot(&plot, &mut surface, true).unwrap();

        let img = surface.compose();
        let red = Rgba([255, 0, 0, 255]);
        assert!(img.pixels().any(|p| *p == red));
        assert_eq!(surface.legend(), vec!["T1"]);
        assert!(dir.path().join("preview.png").exists());
    }

    #[test]
    fn test_hidden_and_log_lines() {
        let mut surface = RasterSurface::new(120, 80);
        surface.set_axes(&AxisMetadata {
            y_scale_kind: "log".to_string(),
            ..AxisMetadata::default()
        });
        surface.plot_line(&[0.0, 1.0], &[1.0, 100.0], "hidden", "blue", "None");
        surface.plot_line(&[0.0, 1.0], &[-1.0, 0.0], "nonpositive", "blue", "-");

        let img = surface.compose();
        let blue = Rgba([0, 0, 255, 255]);
        assert!(!img.pixels().any(|p| *p == blue));
    }
}
