//! MTEF 3 body decoding: the record type lives in the low nibble of a single
//! tag byte and the option flags in the high nibble.
//!
//! The dispatch loop peels the tag to decide the record kind, then rewinds
//! one byte so each sub-reader re-parses the tag and its own option nibble.

use crate::constants::{tag, LineOptions, V3CharOptions};
use crate::error::{Error, Result};
use crate::records::{MtChar, MtEmbell, MtLine, MtMatrix, MtPile, MtTmpl, Node, SizeMark};

impl super::MtefParser<'_> {
    pub(super) fn read_body_v3(&mut self) {
        loop {
            if self.reader.is_empty() {
                break;
            }
            let tag_byte = match self.reader.read_u8() {
                Ok(b) => b,
                Err(e) => {
                    self.set_error(e);
                    break;
                },
            };
            let rec_type = tag_byte & 0x0F;

            if rec_type == tag::END {
                self.nodes.push(Node::End);
                continue;
            }

            // Structure records re-read their tag byte themselves.
            if matches!(
                rec_type,
                tag::LINE | tag::CHAR | tag::TMPL | tag::PILE | tag::MATRIX | tag::EMBELL
            ) {
                self.reader.back(1);
            }

            let result = match rec_type {
                tag::LINE => self.read_line_v3().map(|l| self.nodes.push(Node::Line(l))),
                tag::CHAR => self.read_char_v3().map(|c| self.nodes.push(Node::Char(c))),
                tag::TMPL => self.read_tmpl_v3().map(|t| self.nodes.push(Node::Tmpl(t))),
                tag::PILE => self.read_pile_v3().map(|p| self.nodes.push(Node::Pile(p))),
                tag::MATRIX => self
                    .read_matrix_v3()
                    .map(|m| self.nodes.push(Node::Matrix(m))),
                tag::EMBELL => self
                    .read_embell_v3()
                    .map(|e| self.nodes.push(Node::Embell(e))),
                tag::SIZE => {
                    // lsize and dsize bytes.
                    self.reader.read_u8().and_then(|_| self.reader.read_u8()).map(|_| ())
                },
                tag::FULL => {
                    self.nodes.push(Node::Size(SizeMark::Full));
                    Ok(())
                },
                tag::SUB => {
                    self.nodes.push(Node::Size(SizeMark::Sub));
                    Ok(())
                },
                tag::SUB2 => {
                    self.nodes.push(Node::Size(SizeMark::Sub2));
                    Ok(())
                },
                tag::SYM => {
                    self.nodes.push(Node::Size(SizeMark::Sym));
                    Ok(())
                },
                tag::SUBSYM => {
                    self.nodes.push(Node::Size(SizeMark::SubSym));
                    Ok(())
                },
                _ => Err(Error::UnknownRecord {
                    tag: rec_type,
                    offset: self.reader.position().saturating_sub(1),
                }),
            };

            if let Err(e) = result {
                self.set_error(e);
                break;
            }
        }
    }

    fn read_tag_v3(&mut self, expected: u8, what: &str) -> Result<u8> {
        let tag_byte = self.reader.read_u8()?;
        if tag_byte & 0x0F != expected {
            return Err(Error::MalformedRecord(format!(
                "{} record has tag nibble {}, expected {}",
                what,
                tag_byte & 0x0F,
                expected
            )));
        }
        Ok((tag_byte & 0xF0) >> 4)
    }

    fn read_line_v3(&mut self) -> Result<MtLine> {
        let options = LineOptions::from_bits_retain(self.read_tag_v3(tag::LINE, "LINE")?);
        let mut line = MtLine::default();
        if options.contains(LineOptions::NUDGE) {
            (line.nudge_x, line.nudge_y) = self.read_nudge_v3()?;
        }
        if options.contains(LineOptions::LSPACE) {
            line.line_spacing = self.reader.read_u8()?;
        }
        if options.contains(LineOptions::RULER) {
            self.read_ruler_v3()?;
        }
        if options.contains(LineOptions::NULL) {
            line.null = true;
        }
        Ok(line)
    }

    /// The v3 RULER record is a complete record of its own: tag byte, an
    /// optional nudge, then a body this decoder does not model. The body is
    /// left for the main loop, which surfaces anything unrecognized as an
    /// error on the equation.
    fn read_ruler_v3(&mut self) -> Result<()> {
        let options = self.read_tag_v3(tag::RULER, "RULER")?;
        if options & LineOptions::NUDGE.bits() != 0 {
            self.read_nudge_v3()?;
        }
        Ok(())
    }

    fn read_char_v3(&mut self) -> Result<MtChar> {
        let bits = self.read_tag_v3(tag::CHAR, "CHAR")?;
        let options = V3CharOptions::from_bits_retain(bits);
        let mut ch = MtChar {
            options: bits,
            ..MtChar::default()
        };
        if options.contains(V3CharOptions::NUDGE) {
            (ch.nudge_x, ch.nudge_y) = self.read_nudge_v3()?;
        }
        // Typeface byte biased by 128, then the 16-bit character code.
        ch.typeface = self.reader.read_u8()?;
        ch.mtcode = self.reader.read_u16()?;
        Ok(ch)
    }

    fn read_tmpl_v3(&mut self) -> Result<MtTmpl> {
        let options = self.read_tag_v3(tag::TMPL, "TMPL")?;
        let mut tmpl = MtTmpl::default();
        if options & LineOptions::NUDGE.bits() != 0 {
            (tmpl.nudge_x, tmpl.nudge_y) = self.read_nudge_v3()?;
        }
        tmpl.selector = self.reader.read_u8()?;
        tmpl.variation = self.read_variation()?;
        tmpl.options = self.reader.read_u8()?;
        Ok(tmpl)
    }

    fn read_pile_v3(&mut self) -> Result<MtPile> {
        let options = LineOptions::from_bits_retain(self.read_tag_v3(tag::PILE, "PILE")?);
        let mut pile = MtPile::default();
        if options.contains(LineOptions::NUDGE) {
            (pile.nudge_x, pile.nudge_y) = self.read_nudge_v3()?;
        }
        pile.halign = self.reader.read_u8()?;
        pile.valign = self.reader.read_u8()?;
        if options.contains(LineOptions::RULER) {
            self.read_ruler_v3()?;
        }
        Ok(pile)
    }

    fn read_matrix_v3(&mut self) -> Result<MtMatrix> {
        let options = LineOptions::from_bits_retain(self.read_tag_v3(tag::MATRIX, "MATRIX")?);
        let mut matrix = MtMatrix::default();
        if options.contains(LineOptions::NUDGE) {
            (matrix.nudge_x, matrix.nudge_y) = self.read_nudge_v3()?;
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

    fn read_embell_v3(&mut self) -> Result<MtEmbell> {
        let options = self.read_tag_v3(tag::EMBELL, "EMBELL")?;
        let mut embell = MtEmbell::default();
        if options & LineOptions::NUDGE.bits() != 0 {
            (embell.nudge_x, embell.nudge_y) = self.read_nudge_v3()?;
        }
        embell.embell_type = self.reader.read_u8()?;
        Ok(embell)
    }
}

#[cfg(test)]
mod tests {
    use super::super::MtefParser;
    use super::*;

    fn parse_v3(body: &[u8]) -> super::super::Parsed {
        let mut data = vec![3u8, 1, 0, 3, 0];
        data.extend(body);
        MtefParser::new(&data).run()
    }

    #[test]
    fn packed_tag_splits_type_and_options() {
        // LINE with the null flag in the high nibble (0x1 << 4 | 1).
        let parsed = parse_v3(&[0x11]);
        assert!(parsed.error.is_none());
        match &parsed.nodes[0] {
            Node::Line(l) => assert!(l.null),
            other => panic!("expected LINE, got {other:?}"),
        }
    }

    #[test]
    fn char_reads_biased_typeface_and_code() {
        // CHAR, typeface 131 (style 3), mtcode '1'.
        let parsed = parse_v3(&[0x02, 131, 0x31, 0x00]);
        match &parsed.nodes[0] {
            Node::Char(c) => {
                assert_eq!(c.typeface, 131);
                assert_eq!(c.mtcode, 0x31);
            },
            other => panic!("expected CHAR, got {other:?}"),
        }
    }

    #[test]
    fn char_with_nudge_option() {
        // High nibble 0x8 = nudge; two biased bytes follow the tag.
        let parsed = parse_v3(&[0x82, 130, 126, 131, 0x78, 0x00]);
        match &parsed.nodes[0] {
            Node::Char(c) => {
                assert_eq!((c.nudge_x, c.nudge_y), (2, -2));
                assert_eq!(c.mtcode, 0x78);
            },
            other => panic!("expected CHAR, got {other:?}"),
        }
    }

    #[test]
    fn matrix_consumes_separator_arrays() {
        // 2x2 matrix: (2+1) two-bit values round up to 1 byte per axis.
        let mut body = vec![0x05, 0, 0, 0, 2, 2, 0x00, 0x00];
        body.push(0x00); // END closing the matrix
        let parsed = parse_v3(&body);
        assert!(parsed.error.is_none());
        assert_eq!(parsed.nodes.len(), 2);
        match &parsed.nodes[0] {
            Node::Matrix(m) => assert_eq!((m.rows, m.cols), (2, 2)),
            other => panic!("expected MATRIX, got {other:?}"),
        }
    }

    #[test]
    fn large_matrix_separator_byte_count() {
        // 7x4: row list is ceil(8/4) = 2 bytes, column list 2 bytes.
        let body = vec![0x05, 0, 0, 0, 7, 4, 0, 0, 0, 0];
        let parsed = parse_v3(&body);
        assert!(parsed.error.is_none());
        assert!(matches!(parsed.nodes[0], Node::Matrix(_)));
    }

    #[test]
    fn unknown_nibble_sets_sticky_error() {
        // Low nibble 15 is not a v3 record type.
        let parsed = parse_v3(&[0x11, 0x0F]);
        assert!(matches!(
            parsed.error,
            Some(Error::UnknownRecord { tag: 15, .. })
        ));
        assert_eq!(parsed.nodes.len(), 1);
    }

    #[test]
    fn template_record_layout() {
        // TMPL selector 11 (fraction), variation 0, template options 0.
        let parsed = parse_v3(&[0x03, 11, 0, 0]);
        match &parsed.nodes[0] {
            Node::Tmpl(t) => {
                assert_eq!(t.selector, 11);
                assert_eq!(t.variation, 0);
            },
            other => panic!("expected TMPL, got {other:?}"),
        }
    }

    #[test]
    fn embell_record() {
        let parsed = parse_v3(&[0x06, 9]);
        match &parsed.nodes[0] {
            Node::Embell(e) => assert_eq!(e.embell_type, 9),
            other => panic!("expected EMBELL, got {other:?}"),
        }
    }
}
