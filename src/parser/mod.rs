//! MTEF record-stream decoding.
//!
//! The parser reads the version header and then runs one of two
//! version-specific state machines over the record stream, emitting a flat
//! node list. Decoding is best-effort: the first error is recorded and the
//! nodes decoded so far are kept, so callers can still build and render the
//! partial tree.

mod v3;
mod v5;

use crate::binary::EqnReader;
use crate::error::{Error, Result};
use crate::records::Node;

/// Decoded header fields plus the flat record stream.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub mtef_version: u8,
    pub platform: u8,
    pub product: u8,
    pub version: u8,
    pub version_sub: u8,
    pub application: String,
    pub inline: u8,
    pub nodes: Vec<Node>,
    pub error: Option<Error>,
}

/// Streaming decoder for one equation body.
pub(crate) struct MtefParser<'a> {
    reader: EqnReader<'a>,
    mtef_version: u8,
    platform: u8,
    product: u8,
    version: u8,
    version_sub: u8,
    application: String,
    inline: u8,
    nodes: Vec<Node>,
    error: Option<Error>,
}

impl<'a> MtefParser<'a> {
    /// `body` must be positioned at the MTEF header (after the OLE header).
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            reader: EqnReader::new(body),
            mtef_version: 0,
            platform: 0,
            product: 0,
            version: 0,
            version_sub: 0,
            application: String::new(),
            inline: 0,
            nodes: Vec::new(),
            error: None,
        }
    }

    /// Decode the header and body, consuming the parser.
    pub fn run(mut self) -> Parsed {
        match self.read_header() {
            Ok(()) => {
                if self.mtef_version == 3 {
                    self.read_body_v3();
                } else {
                    self.read_body_v5();
                }
            },
            Err(e) => self.error = Some(e),
        }
        Parsed {
            mtef_version: self.mtef_version,
            platform: self.platform,
            product: self.product,
            version: self.version,
            version_sub: self.version_sub,
            application: self.application,
            inline: self.inline,
            nodes: self.nodes,
            error: self.error,
        }
    }

    /// Five unsigned bytes; v3 ends here, every other version continues with
    /// the application key and the inline flag.
    fn read_header(&mut self) -> Result<()> {
        self.mtef_version = self.reader.read_u8()?;
        self.platform = self.reader.read_u8()?;
        self.product = self.reader.read_u8()?;
        self.version = self.reader.read_u8()?;
        self.version_sub = self.reader.read_u8()?;
        if self.mtef_version != 3 {
            let raw = self.reader.read_cstr()?;
            let (name, _, _) = encoding_rs::WINDOWS_1252.decode(raw);
            self.application = name.into_owned();
            self.inline = self.reader.read_u8()?;
        }
        Ok(())
    }

    /// v5 nudge: two 16-bit values, re-read as a signed pair when either
    /// sentinel equals 128.
    fn read_nudge(&mut self) -> Result<(i16, i16)> {
        let b1 = self.reader.read_u16()?;
        let b2 = self.reader.read_u16()?;
        if b1 == 128 || b2 == 128 {
            let x = self.reader.read_i16()?;
            let y = self.reader.read_i16()?;
            Ok((x, y))
        } else {
            Ok((b1 as i16, b2 as i16))
        }
    }

    /// v3 nudge: two bytes biased by 128; both equal to 128 means a full
    /// signed 16-bit pair follows instead.
    fn read_nudge_v3(&mut self) -> Result<(i16, i16)> {
        let b1 = self.reader.read_u8()?;
        let b2 = self.reader.read_u8()?;
        if b1 == 128 && b2 == 128 {
            let x = self.reader.read_i16()?;
            let y = self.reader.read_i16()?;
            Ok((x, y))
        } else {
            Ok((b1 as i16 - 128, b2 as i16 - 128))
        }
    }

    /// Template variation: one byte, or two when bit 7 of the first is set
    /// (low seven bits plus the following byte shifted into the high byte).
    fn read_variation(&mut self) -> Result<u16> {
        let byte1 = self.reader.read_u8()? as u16;
        if byte1 & 0x80 != 0 {
            let byte2 = self.reader.read_u8()? as u16;
            Ok((byte1 & 0x7F) | (byte2 << 8))
        } else {
            Ok(byte1)
        }
    }

    /// EQN_PREFS dimension array: values are packed as nibbles, alternating
    /// between a unit state (in/cm/pt/pc/%) and a digit state where 0x0F
    /// terminates the current value. Malformed data is bounded by an
    /// iteration cap of `size * 10` bytes and an error cap of 50.
    fn read_dimension_array(&mut self, size: usize) -> Vec<String> {
        struct DimScan {
            values: Vec<String>,
            current: String,
            unit_state: bool,
            error_count: usize,
        }

        impl DimScan {
            fn consume(&mut self, nibble: u8) {
                if self.unit_state {
                    match nibble {
                        0x00 => self.current.push_str("in"),
                        0x01 => self.current.push_str("cm"),
                        0x02 => self.current.push_str("pt"),
                        0x03 => self.current.push_str("pc"),
                        0x04 => self.current.push('%'),
                        _ => {
                            self.error_count += 1;
                            return;
                        },
                    }
                    self.unit_state = false;
                } else {
                    match nibble {
                        0x00..=0x09 => self.current.push((b'0' + nibble) as char),
                        0x0A => self.current.push('.'),
                        0x0B => self.current.push('-'),
                        0x0F => {
                            self.unit_state = true;
                            let value = std::mem::take(&mut self.current);
                            self.values.push(value);
                        },
                        _ => self.error_count += 1,
                    }
                }
            }
        }

        let mut scan = DimScan {
            values: Vec::new(),
            current: String::new(),
            unit_state: true,
            error_count: 0,
        };
        let max_iterations = size * 10;
        let mut iterations = 0usize;

        while scan.values.len() < size {
            iterations += 1;
            if iterations > max_iterations || scan.error_count > 50 {
                break;
            }
            let byte = match self.reader.read_u8() {
                Ok(b) => b,
                Err(_) => break,
            };
            scan.consume(byte >> 4);
            scan.consume(byte & 0x0F);
        }
        scan.values
    }

    fn set_error(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_v5_reads_application_key() {
        let mut data = vec![5u8, 1, 0, 5, 2];
        data.extend(b"Equation Editor\0");
        data.push(1);
        let parsed = MtefParser::new(&data).run();
        assert!(parsed.error.is_none());
        assert_eq!(parsed.mtef_version, 5);
        assert_eq!(parsed.application, "Equation Editor");
        assert_eq!(parsed.inline, 1);
    }

    #[test]
    fn header_v3_has_no_application_key() {
        let parsed = MtefParser::new(&[3u8, 1, 0, 3, 0]).run();
        assert!(parsed.error.is_none());
        assert_eq!(parsed.mtef_version, 3);
        assert_eq!(parsed.application, "");
    }

    #[test]
    fn truncated_header_is_an_error() {
        let parsed = MtefParser::new(&[5u8, 1]).run();
        assert!(matches!(parsed.error, Some(Error::UnexpectedEof(_))));
    }

    #[test]
    fn nudge_v3_bias() {
        let mut p = MtefParser::new(&[130u8, 120]);
        assert_eq!(p.read_nudge_v3().unwrap(), (2, -8));
    }

    #[test]
    fn nudge_v3_extended_pair() {
        let mut p = MtefParser::new(&[128u8, 128, 0x2C, 0x01, 0xFF, 0xFF]);
        assert_eq!(p.read_nudge_v3().unwrap(), (300, -1));
    }

    #[test]
    fn nudge_v5_sentinel_reads_override_pair() {
        let mut p = MtefParser::new(&[128u8, 0, 5, 0, 0x0A, 0x00, 0xF6, 0xFF]);
        assert_eq!(p.read_nudge().unwrap(), (10, -10));
    }

    #[test]
    fn variation_two_byte_form() {
        let mut p = MtefParser::new(&[0x81u8, 0x02]);
        assert_eq!(p.read_variation().unwrap(), 0x0201);
        let mut p = MtefParser::new(&[0x7Fu8]);
        assert_eq!(p.read_variation().unwrap(), 0x7F);
    }

    #[test]
    fn dimension_array_decodes_units_and_digits() {
        // 2pt then 10in: unit nibble, digit nibbles, 0x0F terminator each.
        let data = [0x22u8, 0xF0, 0x10, 0xF0];
        let mut p = MtefParser::new(&data);
        assert_eq!(p.read_dimension_array(2), vec!["pt2", "in10"]);
    }

    #[test]
    fn dimension_array_stops_on_garbage() {
        // Unit nibble 0xC is invalid; the error counter must bound the scan.
        let data = [0xCCu8; 64];
        let mut p = MtefParser::new(&data);
        assert!(p.read_dimension_array(3).is_empty());
    }
}
