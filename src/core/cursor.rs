// Sequential little-endian reader over an in-memory plot stream

use crate::core::constants::*;
use crate::core::error::{PlotError, Result};

/// Read position over a borrowed byte buffer.
///
/// Every read either consumes exactly the bytes it asked for or fails and
/// leaves the position untouched, whatever the error. The position never
/// moves past the end of the buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn truncated(&self, needed: u64) -> PlotError {
        PlotError::TruncatedStream {
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len as u64));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.take_array::<U8_SIZE>()?;
        Ok(byte)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array::<U32_SIZE>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array::<U64_SIZE>()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array::<I64_SIZE>()?))
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u64()?;
        let bytes = match usize::try_from(len) {
            Ok(len) => self.take(len),
            Err(_) => Err(self.truncated(len)),
        };
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(e) => {
                self.pos = start;
                return Err(e);
            }
        };

        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(e) => {
                self.pos = start;
                Err(e.into())
            }
        }
    }

    pub fn read_element_width(&mut self) -> Result<ElementWidth> {
        let tag = self.read_u8()?;
        ElementWidth::from_u8(tag).ok_or_else(|| {
            self.pos -= 1;
            PlotError::UnsupportedWidth(tag)
        })
    }

    /// Reads `count` floats of the given width, promoted to f64.
    pub fn read_float_array(&mut self, width: ElementWidth, count: u64) -> Result<Vec<f64>> {
        let byte_len = count
            .checked_mul(width.size() as u64)
            .ok_or_else(|| self.truncated(u64::MAX))?;
        let byte_len = usize::try_from(byte_len).map_err(|_| self.truncated(byte_len))?;
        let bytes = self.take(byte_len)?;

        let values = match width {
            ElementWidth::F32 => bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
                .collect(),
            ElementWidth::F64 => bytes
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        };
        Ok(values)
    }

    /// Single tagged float: one width byte followed by one value.
    pub fn read_tagged_float(&mut self) -> Result<f64> {
        let width = self.read_element_width()?;
        let values = self.read_float_array(width, 1)?;
        Ok(values[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_integers_little_endian() {
        let mut data = vec![0x2A];
        data.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
        data.extend_from_slice(&u64::MAX.to_le_bytes());
        data.extend_from_slice(&(-3i64).to_le_bytes());

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 0x2A);
        assert_eq!(cursor.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(cursor.read_u64().unwrap(), u64::MAX);
        assert_eq!(cursor.read_i64().unwrap(), -3);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_short_read_leaves_position() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        cursor.read_u8().unwrap();

        let err = cursor.read_u32().unwrap_err();
        assert!(matches!(
            err,
            PlotError::TruncatedStream { offset: 1, needed: 4, available: 2 }
        ));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_read_string() {
        let mut data = 5u64.to_le_bytes().to_vec();
        data.extend_from_slice(b"hello");
        data.extend_from_slice(&0u64.to_le_bytes());

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_string().unwrap(), "hello");
        assert_eq!(cursor.read_string().unwrap(), "");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_string_truncated() {
        let mut data = 10u64.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");

        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            cursor.read_string(),
            Err(PlotError::TruncatedStream { needed: 10, .. })
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let mut data = 2u64.to_le_bytes().to_vec();
        data.extend_from_slice(&[0xC3, 0x28]);

        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(cursor.read_string(), Err(PlotError::InvalidEncoding(_))));
    }

    #[test]
    fn test_element_width_tags() {
        let data = [4u8, 8, 2];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_element_width().unwrap(), ElementWidth::F32);
        assert_eq!(cursor.read_element_width().unwrap(), ElementWidth::F64);
        assert!(matches!(
            cursor.read_element_width(),
            Err(PlotError::UnsupportedWidth(2))
        ));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_float_array_promotes_f32() {
        let mut data = Vec::new();
        for v in [1.5f32, -0.25] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        for v in [0.1f64, 1e300] {
            data.extend_from_slice(&v.to_le_bytes());
        }

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(
            cursor.read_float_array(ElementWidth::F32, 2).unwrap(),
            vec![1.5, -0.25]
        );
        assert_eq!(
            cursor.read_float_array(ElementWidth::F64, 2).unwrap(),
            vec![0.1, 1e300]
        );
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_float_array_huge_count_is_truncated() {
        let data = [0u8; 16];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            cursor.read_float_array(ElementWidth::F64, u64::MAX),
            Err(PlotError::TruncatedStream { .. })
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_tagged_float() {
        let mut data = vec![8u8];
        data.extend_from_slice(&0.1f64.to_le_bytes());
        data.push(4);
        data.extend_from_slice(&2.0f32.to_le_bytes());

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_tagged_float().unwrap(), 0.1);
        assert_eq!(cursor.read_tagged_float().unwrap(), 2.0);
    }
}
