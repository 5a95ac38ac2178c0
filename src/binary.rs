//! Positioned little-endian reading over an equation body.
//!
//! `EqnReader` is a forward-seekable view over the MTEF byte stream. All
//! multi-byte integers are little-endian. Reads are bounds-checked; running
//! short returns [`Error::UnexpectedEof`] with the offending offset so the
//! parser can record it on the equation.

use crate::error::{Error, Result};

/// Cursor over the equation body.
#[derive(Debug, Clone)]
pub struct EqnReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> EqnReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the body.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// True once the cursor has consumed the whole body. The record loops
    /// use this to tell a clean end-of-stream from a truncated record.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            },
            None => Err(Error::UnexpectedEof(self.pos)),
        }
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.take(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Advance the cursor by `n` bytes, clamping at the end of the body.
    ///
    /// Clamping matters for FUTURE records: a skip length that overshoots the
    /// stream simply ends decoding at the next loop iteration.
    pub fn skip(&mut self, n: usize) {
        self.pos = self.data.len().min(self.pos + n);
    }

    /// Rewind by `n` bytes. The v3 sub-readers step back one byte so they
    /// can re-parse the packed tag byte themselves.
    pub fn back(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    /// Read bytes up to (not including) the next NUL and consume the NUL.
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        match memchr::memchr(0, rest) {
            Some(idx) => {
                let s = &rest[..idx];
                self.pos += idx + 1;
                Ok(s)
            },
            None => Err(Error::UnexpectedEof(self.data.len())),
        }
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(Error::UnexpectedEof(self.pos));
        }
        let s = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let mut r = EqnReader::new(&[0x34, 0x12, 0xFF, 0xFF, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_i16().unwrap(), -1);
        assert_eq!(r.read_u32().unwrap(), 0x12345678);
        assert!(r.is_empty());
    }

    #[test]
    fn short_read_reports_offset() {
        let mut r = EqnReader::new(&[0x01]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16(), Err(Error::UnexpectedEof(1)));
    }

    #[test]
    fn skip_clamps_at_end() {
        let mut r = EqnReader::new(&[1, 2, 3]);
        r.skip(100);
        assert!(r.is_empty());
        assert_eq!(r.position(), 3);
    }

    #[test]
    fn cstr_consumes_terminator() {
        let mut r = EqnReader::new(b"MathType\0\x05");
        assert_eq!(r.read_cstr().unwrap(), b"MathType");
        assert_eq!(r.read_u8().unwrap(), 5);
    }

    #[test]
    fn cstr_without_terminator_is_truncation() {
        let mut r = EqnReader::new(b"abc");
        assert!(matches!(r.read_cstr(), Err(Error::UnexpectedEof(_))));
    }

    #[test]
    fn back_rewinds() {
        let mut r = EqnReader::new(&[0xAB, 0xCD]);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
        r.back(1);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
    }
}
