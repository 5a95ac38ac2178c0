//! Stream header structures.
//!
//! An OLE "Equation Native" stream starts with a 28-byte EQNOLEFILEHDR
//! followed by the MTEF header and record data. Only `cb_hdr` and `cb_size`
//! matter for locating the body; the version and clipboard-format words vary
//! between producers and are not validated.

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned, LE, U16, U32};

use crate::error::{Error, Result};

/// Length of the EQNOLEFILEHDR.
pub const OLE_HEADER_LEN: usize = 28;

/// EQNOLEFILEHDR: the fixed header preceding MTEF data in an
/// "Equation Native" stream.
#[derive(Debug, Clone, FromBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct EqnOleFileHeader {
    /// Total header length, always 28.
    pub cb_hdr: U16<LE>,
    /// Format version word (hiword 2, loword 0); not validated.
    pub version: U32<LE>,
    /// Clipboard format; varies between producers, not validated.
    pub cf: U16<LE>,
    /// Length of the MTEF header plus MTEF data.
    pub cb_size: U32<LE>,
    pub reserved: [U32<LE>; 4],
}

impl EqnOleFileHeader {
    /// Parse and validate the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<&Self> {
        let (header, _) = Self::ref_from_prefix(data).map_err(|_| {
            Error::InvalidHeader(format!(
                "stream too short for EQNOLEFILEHDR: {} bytes",
                data.len()
            ))
        })?;
        if header.cb_hdr.get() as usize != OLE_HEADER_LEN {
            return Err(Error::InvalidHeader(format!(
                "cbHdr is {}, expected {}",
                header.cb_hdr.get(),
                OLE_HEADER_LEN
            )));
        }
        Ok(header)
    }

    /// Byte range of the MTEF body inside a stream of `total_len` bytes.
    ///
    /// Producers sometimes write a `cb_size` larger than the stream actually
    /// is; the range is clamped so a short stream decodes as far as it goes.
    pub fn body_range(&self, total_len: usize) -> std::ops::Range<usize> {
        let start = (self.cb_hdr.get() as usize).min(total_len);
        let end = start.saturating_add(self.cb_size.get() as usize).min(total_len);
        start..end
    }
}
