// Format constants for the line-plot and panel-video streams

/// Width tag for IEEE single precision values.
pub const WIDTH_TAG_F32: u8 = 4;
/// Width tag for IEEE double precision values.
pub const WIDTH_TAG_F64: u8 = 8;

// Scalar field sizes
pub const U8_SIZE: usize = 1;
pub const U32_SIZE: usize = 4;
pub const U64_SIZE: usize = 8;
pub const I64_SIZE: usize = 8;

// Axis header: title, x_label, y_label, x_scale, y_scale
pub const AXIS_STRING_COUNT: usize = 5;

// Spatial scale is always a (dx, dy) pair
pub const SPATIAL_SCALE_LEN: u64 = 2;

/// Element width tag carried ahead of every numeric array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    F32,
    F64,
}

impl ElementWidth {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            WIDTH_TAG_F32 => Some(ElementWidth::F32),
            WIDTH_TAG_F64 => Some(ElementWidth::F64),
            _ => None,
        }
    }

    /// Bytes per element on the wire.
    pub fn size(self) -> usize {
        match self {
            ElementWidth::F32 => 4,
            ElementWidth::F64 => 8,
        }
    }
}
