// Animation synchronisation across panels of unequal length

use crate::core::format::{Frame, VideoDocument};
use std::iter::FusedIterator;

/// What every panel shows at one global frame index.
#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizedFrame<'a> {
    pub global_index: usize,
    /// `(panel_index, frame)` for each panel with data at this index, in
    /// panel order.
    pub active_panels: Vec<(usize, &'a Frame)>,
    /// Minimum over the active frames only, NaN elements skipped. NaN when
    /// nothing remains.
    pub value_min: f64,
    /// Maximum over the active frames only, NaN elements skipped. NaN when
    /// nothing remains.
    pub value_max: f64,
}

impl SynchronizedFrame<'_> {
    pub fn is_active(&self, panel_index: usize) -> bool {
        self.active_panels.iter().any(|(i, _)| *i == panel_index)
    }

    pub fn value_range(&self) -> (f64, f64) {
        (self.value_min, self.value_max)
    }
}

/// (min, max) over all elements of the given frames. NaN elements are
/// ignored; when nothing else is left (no frames, empty frames, all NaN) the
/// result is `(NaN, NaN)`.
pub fn value_range<'a, I>(frames: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a Frame>,
{
    let mut any = false;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for frame in frames {
        for &v in frame.values().iter().filter(|v| !v.is_nan()) {
            any = true;
            min = min.min(v);
            max = max.max(v);
        }
    }

    if any {
        (min, max)
    } else {
        (f64::NAN, f64::NAN)
    }
}

/// Lazy sequence of [`SynchronizedFrame`]s over `[0, max_frame_count)`.
///
/// Borrows the document immutably; cloning the iterator or calling
/// [`frames`] again restarts from index 0 with identical output.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    video: &'a VideoDocument,
    next: usize,
    end: usize,
}

impl<'a> Frames<'a> {
    pub fn new(video: &'a VideoDocument) -> Self {
        Self {
            video,
            next: 0,
            end: video.max_frame_count(),
        }
    }

    /// Random access, independent of the iteration position.
    pub fn at(&self, global_index: usize) -> Option<SynchronizedFrame<'a>> {
        if global_index >= self.end {
            return None;
        }

        let active_panels: Vec<(usize, &'a Frame)> = self
            .video
            .panels
            .iter()
            .enumerate()
            .filter_map(|(i, panel)| panel.frame_at(global_index).map(|f| (i, f)))
            .collect();

        let (value_min, value_max) = value_range(active_panels.iter().map(|(_, f)| *f));

        Some(SynchronizedFrame {
            global_index,
            active_panels,
            value_min,
            value_max,
        })
    }

    pub fn total(&self) -> usize {
        self.end
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = SynchronizedFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.at(self.next)?;
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}

pub fn frames(video: &VideoDocument) -> Frames<'_> {
    Frames::new(video)
}

impl VideoDocument {
    pub fn frames(&self) -> Frames<'_> {
        Frames::new(self)
    }
}
