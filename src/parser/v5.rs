//! MTEF 5 body decoding: a full type byte per record followed by an option
//! byte, with option-conditional fields.

use crate::constants::{tag, CharOptions, ColorDefOptions, LineOptions, StructOptions};
use crate::error::{Error, Result};
use crate::records::{MtChar, MtEmbell, MtLine, MtMatrix, MtPile, MtTmpl, Node, SizeMark};

impl super::MtefParser<'_> {
    pub(super) fn read_body_v5(&mut self) {
        loop {
            if self.reader.is_empty() {
                break;
            }
            let record = match self.reader.read_u8() {
                Ok(b) => b,
                Err(e) => {
                    self.set_error(e);
                    break;
                },
            };

            // Reserved-future records carry a one-byte length to skip.
            if record >= tag::FUTURE {
                match self.reader.read_u8() {
                    Ok(len) => self.reader.skip(len as usize),
                    Err(e) => {
                        self.set_error(e);
                        break;
                    },
                }
                continue;
            }

            if let Err(e) = self.read_record_v5(record) {
                self.set_error(e);
                break;
            }
        }
    }

    fn read_record_v5(&mut self, record: u8) -> Result<()> {
        match record {
            tag::END => self.nodes.push(Node::End),
            tag::LINE => {
                let line = self.read_line()?;
                self.nodes.push(Node::Line(line));
            },
            tag::CHAR => {
                let ch = self.read_char()?;
                self.nodes.push(Node::Char(ch));
            },
            tag::TMPL => {
                let tmpl = self.read_tmpl()?;
                self.nodes.push(Node::Tmpl(tmpl));
            },
            tag::PILE => {
                let pile = self.read_pile()?;
                self.nodes.push(Node::Pile(pile));
            },
            tag::MATRIX => {
                let matrix = self.read_matrix()?;
                self.nodes.push(Node::Matrix(matrix));
            },
            tag::EMBELL => {
                let embell = self.read_embell()?;
                self.nodes.push(Node::Embell(embell));
            },
            tag::FONT_STYLE_DEF => {
                self.reader.read_u8()?;
                self.reader.read_cstr()?;
            },
            tag::SIZE => {
                // lsize and dsize bytes; sizing metadata is not retained.
                self.reader.read_u8()?;
                self.reader.read_u8()?;
            },
            tag::FULL => self.nodes.push(Node::Size(SizeMark::Full)),
            tag::SUB => self.nodes.push(Node::Size(SizeMark::Sub)),
            tag::SUB2 => self.nodes.push(Node::Size(SizeMark::Sub2)),
            tag::SYM => self.nodes.push(Node::Size(SizeMark::Sym)),
            tag::SUBSYM => self.nodes.push(Node::Size(SizeMark::SubSym)),
            tag::COLOR => {
                self.reader.read_u8()?;
            },
            tag::COLOR_DEF => self.read_color_def()?,
            tag::FONT_DEF => {
                self.reader.read_u8()?;
                self.reader.read_cstr()?;
            },
            tag::EQN_PREFS => self.read_eqn_prefs()?,
            tag::ENCODING_DEF => {
                self.reader.read_cstr()?;
            },
            _ => {
                return Err(Error::UnknownRecord {
                    tag: record,
                    offset: self.reader.position().saturating_sub(1),
                });
            },
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<MtLine> {
        let options = LineOptions::from_bits_retain(self.reader.read_u8()?);
        let mut line = MtLine::default();
        if options.contains(LineOptions::NUDGE) {
            (line.nudge_x, line.nudge_y) = self.read_nudge()?;
        }
        if options.contains(LineOptions::LSPACE) {
            line.line_spacing = self.reader.read_u8()?;
        }
        if options.contains(LineOptions::RULER) {
            self.read_ruler()?;
        }
        if options.contains(LineOptions::NULL) {
            line.null = true;
        }
        Ok(line)
    }

    /// Tab-stop list: a count byte, then one type byte and a 16-bit offset
    /// per stop. Read and discarded.
    fn read_ruler(&mut self) -> Result<()> {
        let n_stops = self.reader.read_u8()?;
        for _ in 0..n_stops {
            self.reader.read_u8()?;
            self.reader.read_u16()?;
        }
        Ok(())
    }

    fn read_char(&mut self) -> Result<MtChar> {
        let bits = self.reader.read_u8()?;
        let options = CharOptions::from_bits_retain(bits);
        let mut ch = MtChar {
            options: bits,
            ..MtChar::default()
        };
        if options.contains(CharOptions::NUDGE) {
            (ch.nudge_x, ch.nudge_y) = self.read_nudge()?;
        }
        ch.typeface = self.reader.read_u8()?;
        if !options.contains(CharOptions::ENC_NO_MTCODE) {
            ch.mtcode = self.reader.read_u16()?;
        }
        if options.contains(CharOptions::ENC_CHAR8) {
            ch.bits8 = self.reader.read_u8()?;
        }
        if options.contains(CharOptions::ENC_CHAR16) {
            ch.bits16 = self.reader.read_u16()?;
        }
        Ok(ch)
    }

    fn read_tmpl(&mut self) -> Result<MtTmpl> {
        let options = StructOptions::from_bits_retain(self.reader.read_u8()?);
        let mut tmpl = MtTmpl::default();
        if options.contains(StructOptions::NUDGE) {
            (tmpl.nudge_x, tmpl.nudge_y) = self.read_nudge()?;
        }
        tmpl.selector = self.reader.read_u8()?;
        tmpl.variation = self.read_variation()?;
        tmpl.options = self.reader.read_u8()?;
        Ok(tmpl)
    }

    fn read_pile(&mut self) -> Result<MtPile> {
        let options = StructOptions::from_bits_retain(self.reader.read_u8()?);
        let mut pile = MtPile::default();
        if options.contains(StructOptions::NUDGE) {
            (pile.nudge_x, pile.nudge_y) = self.read_nudge()?;
        }
        pile.halign = self.reader.read_u8()?;
        pile.valign = self.reader.read_u8()?;
        Ok(pile)
    }

    fn read_matrix(&mut self) -> Result<MtMatrix> {
        let options = StructOptions::from_bits_retain(self.reader.read_u8()?);
        let mut matrix = MtMatrix::default();
        if options.contains(StructOptions::NUDGE) {
            (matrix.nudge_x, matrix.nudge_y) = self.read_nudge()?;
        }
        matrix.valign = self.reader.read_u8()?;
        matrix.h_just = self.reader.read_u8()?;
        matrix.v_just = self.reader.read_u8()?;
        matrix.rows = self.reader.read_u8()?;
        matrix.cols = self.reader.read_u8()?;

        // Separator style lists: one more separator than rows (columns),
        // two bits each, rounded up to whole bytes. Styles are not kept.
        let row_bytes = (matrix.rows as usize + 1).div_ceil(4);
        let col_bytes = (matrix.cols as usize + 1).div_ceil(4);
        for _ in 0..row_bytes + col_bytes {
            self.reader.read_u8()?;
        }
        Ok(matrix)
    }

    fn read_embell(&mut self) -> Result<MtEmbell> {
        let options = StructOptions::from_bits_retain(self.reader.read_u8()?);
        let mut embell = MtEmbell::default();
        if options.contains(StructOptions::NUDGE) {
            (embell.nudge_x, embell.nudge_y) = self.read_nudge()?;
        }
        embell.embell_type = self.reader.read_u8()?;
        Ok(embell)
    }

    fn read_color_def(&mut self) -> Result<()> {
        let options = ColorDefOptions::from_bits_retain(self.reader.read_u8()?);
        let components = if options.contains(ColorDefOptions::CMYK) { 4 } else { 3 };
        for _ in 0..components {
            self.reader.read_u16()?;
        }
        if options.contains(ColorDefOptions::NAME) {
            self.reader.read_cstr()?;
        }
        Ok(())
    }

    fn read_eqn_prefs(&mut self) -> Result<()> {
        self.reader.read_u8()?; // options

        let sizes = self.reader.read_u8()? as usize;
        self.read_dimension_array(sizes);

        let spaces = self.reader.read_u8()? as usize;
        self.read_dimension_array(spaces);

        // Style list: a zero byte stands for an absent entry, anything else
        // is followed by the actual style byte.
        let styles = self.reader.read_u8()?;
        for _ in 0..styles {
            let c = self.reader.read_u8()?;
            if c != 0 {
                self.reader.read_u8()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::MtefParser;
    use super::*;

    fn parse_v5(body: &[u8]) -> super::super::Parsed {
        let mut data = vec![5u8, 1, 0, 5, 2, 0, 1];
        data.extend(body);
        MtefParser::new(&data).run()
    }

    #[test]
    fn line_char_end_stream() {
        // LINE, CHAR 'x' (typeface 131), END
        let parsed = parse_v5(&[1, 0, 2, 0, 131, 0x78, 0x00, 0]);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.nodes.len(), 3);
        assert!(matches!(parsed.nodes[0], Node::Line(_)));
        match &parsed.nodes[1] {
            Node::Char(c) => {
                assert_eq!(c.mtcode, 0x78);
                assert_eq!(c.typeface, 131);
            },
            other => panic!("expected CHAR, got {other:?}"),
        }
        assert!(matches!(parsed.nodes[2], Node::End));
    }

    #[test]
    fn null_line_flag() {
        let parsed = parse_v5(&[1, 0x01]);
        match &parsed.nodes[0] {
            Node::Line(l) => assert!(l.null),
            other => panic!("expected LINE, got {other:?}"),
        }
    }

    #[test]
    fn future_record_is_skipped() {
        // FUTURE record type 120 with 3 payload bytes, then a LINE.
        let parsed = parse_v5(&[120, 3, 0xDE, 0xAD, 0xBE, 1, 0]);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.nodes.len(), 1);
        assert!(matches!(parsed.nodes[0], Node::Line(_)));
    }

    #[test]
    fn matrix_consumes_separator_arrays() {
        // 2x2: (2+1) two-bit values round up to 1 byte per axis. Non-zero
        // style bits must be swallowed, not parsed as records.
        let parsed = parse_v5(&[5, 0, 0, 0, 0, 2, 2, 0x15, 0x00]);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.nodes.len(), 1);
        match &parsed.nodes[0] {
            Node::Matrix(m) => assert_eq!((m.rows, m.cols), (2, 2)),
            other => panic!("expected MATRIX, got {other:?}"),
        }
    }

    #[test]
    fn large_matrix_separator_byte_count() {
        // 4x4: five two-bit values per axis round up to 2 bytes each.
        let parsed = parse_v5(&[5, 0, 0, 0, 0, 4, 4, 0, 0, 0, 0, 1, 0x01]);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.nodes.len(), 2);
        assert!(matches!(parsed.nodes[0], Node::Matrix(_)));
        // The trailing null LINE proves the cursor lines up after the
        // four partition bytes.
        match &parsed.nodes[1] {
            Node::Line(l) => assert!(l.null),
            other => panic!("expected LINE, got {other:?}"),
        }
    }

    #[test]
    fn truncated_matrix_partition_is_an_error() {
        let parsed = parse_v5(&[5, 0, 0, 0, 0, 2, 2, 0]);
        assert!(matches!(parsed.error, Some(Error::UnexpectedEof(_))));
    }

    #[test]
    fn unknown_record_sets_sticky_error() {
        let parsed = parse_v5(&[1, 0, 7, 0xAA, 1, 0]);
        assert!(matches!(parsed.error, Some(Error::UnknownRecord { tag: 7, .. })));
        // The line decoded before the failure is preserved.
        assert_eq!(parsed.nodes.len(), 1);
    }

    #[test]
    fn truncated_char_sets_sticky_error() {
        let parsed = parse_v5(&[2, 0, 131]);
        assert!(matches!(parsed.error, Some(Error::UnexpectedEof(_))));
    }

    #[test]
    fn template_with_two_byte_variation() {
        // TMPL, options 0, selector 14, variation 0x81 0x02, options byte 0.
        let parsed = parse_v5(&[3, 0, 14, 0x81, 0x02, 0]);
        match &parsed.nodes[0] {
            Node::Tmpl(t) => {
                assert_eq!(t.selector, 14);
                assert_eq!(t.variation, 0x0201);
            },
            other => panic!("expected TMPL, got {other:?}"),
        }
    }

    #[test]
    fn discarded_records_leave_no_nodes() {
        let mut body = vec![17u8, 1]; // FONT_DEF index 1
        body.extend(b"Symbol\0");
        body.extend([19u8]); // ENCODING_DEF
        body.extend(b"MTEF\0");
        body.extend([15u8, 2]); // COLOR index 2
        body.extend([9u8, 3, 4]); // SIZE lsize 3 dsize 4
        let parsed = parse_v5(&body);
        assert!(parsed.error.is_none());
        assert!(parsed.nodes.is_empty());
    }

    #[test]
    fn eqn_prefs_consumed() {
        let mut body = vec![18u8, 0]; // EQN_PREFS, options 0
        body.push(1); // one size entry
        body.extend([0x25, 0xF0]); // pt5 terminated, trailing unit nibble ignored
        body.push(0); // no spaces
        body.push(2); // two style entries
        body.extend([0, 1, 7]); // absent entry, then style byte 7
        body.extend([1u8, 0x01]); // trailing null LINE proves the cursor lines up
        let parsed = parse_v5(&body);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.nodes.len(), 1);
        match &parsed.nodes[0] {
            Node::Line(l) => assert!(l.null),
            other => panic!("expected LINE, got {other:?}"),
        }
    }
}
