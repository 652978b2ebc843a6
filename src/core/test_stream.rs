// Byte builder for hand-assembled test streams

use crate::core::constants::ElementWidth;

#[derive(Default)]
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(mut self, v: i64) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn string(self, s: &str) -> Self {
        let mut this = self.u64(s.len() as u64);
        this.buf.extend_from_slice(s.as_bytes());
        this
    }

    pub fn floats(mut self, width: ElementWidth, values: &[f64]) -> Self {
        for &v in values {
            match width {
                ElementWidth::F32 => self.buf.extend_from_slice(&(v as f32).to_le_bytes()),
                ElementWidth::F64 => self.buf.extend_from_slice(&v.to_le_bytes()),
            }
        }
        self
    }

    pub fn width(self, width: ElementWidth) -> Self {
        self.u8(width.size() as u8)
    }

    pub fn axes(self, title: &str, x_label: &str, y_label: &str, x_scale: &str, y_scale: &str) -> Self {
        self.string(title)
            .string(x_label)
            .string(y_label)
            .string(x_scale)
            .string(y_scale)
    }

    pub fn series(self, label: &str, color: &str, style: &str, x: &[f64], y: &[f64]) -> Self {
        self.string(label)
            .string(color)
            .string(style)
            .width(ElementWidth::F64)
            .width(ElementWidth::F64)
            .u64(x.len() as u64)
            .floats(ElementWidth::F64, x)
            .floats(ElementWidth::F64, y)
    }

    pub fn named_scalar(self, name: &str, value: f64) -> Self {
        self.string(name)
            .width(ElementWidth::F64)
            .floats(ElementWidth::F64, &[value])
    }

    /// Panel block with f64 values and spatial scale (1, 1).
    pub fn panel(self, sub_title: &str, rows: i64, cols: i64, frame_count: u64, values: &[f64]) -> Self {
        self.width(ElementWidth::F64)
            .width(ElementWidth::F64)
            .string(sub_title)
            .floats(ElementWidth::F64, &[1.0, 1.0])
            .i64(rows)
            .i64(cols)
            .u32(20)
            .u64(frame_count)
            .floats(ElementWidth::F64, values)
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
