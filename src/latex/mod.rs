//! LaTeX rendering: a post-order walk of the expression tree.
//!
//! Template output dispatches on `(selector, variation)`; characters go
//! through the injected [`CharTable`](crate::charset::CharTable). The
//! renderer never fails: missing slots render empty, unknown selectors emit
//! a sentinel and log a warning, so a damaged equation still yields its
//! best-effort LaTeX.

mod embellish;
pub(crate) mod fixup;
mod v3;

use std::fmt::Write;

use crate::charset::CharTable;
use crate::constants::{arrow_variation, selector, typeface, vec_variation, TV_BAR_DOUBLE};
use crate::records::{MtChar, MtMatrix, MtTmpl};
use crate::tree::{Ast, AstKind, NodeId};

/// Emitted when a template selector has no LaTeX form.
pub(crate) const TMPL_NOT_IMPLEMENTED: &str = "latex tmpl not implement";

/// Render a decoded equation. v3 output is wrapped `$ … $`; v5 output is
/// returned bare and wrapping is the caller's concern. Both pass through the
/// consecutive-script fixup.
pub(crate) fn translate(ast: &Ast, mtef_version: u8, chars: &CharTable) -> String {
    if mtef_version == 3 {
        let body = v3::V3Emitter { ast, chars }.render(Ast::ROOT);
        format!("${}$", fixup::fix_consecutive_scripts(&body))
    } else {
        let body = Emitter { ast, chars }.render(Ast::ROOT);
        fixup::fix_consecutive_scripts(&body)
    }
}

struct Emitter<'a> {
    ast: &'a Ast,
    chars: &'a CharTable,
}

impl Emitter<'_> {
    fn render(&self, id: NodeId) -> String {
        match self.ast.kind(id) {
            AstKind::Root => self.render_run(self.ast.children(id)),
            AstKind::Line(line) => {
                if line.null {
                    String::new()
                } else {
                    self.render_run(self.ast.children(id))
                }
            },
            AstKind::Char(ch) => self.render_char(ch),
            AstKind::Tmpl(tmpl) => self.render_template(id, tmpl),
            AstKind::Pile(_) => {
                let parts: Vec<String> = self
                    .ast
                    .children(id)
                    .iter()
                    .map(|&c| self.render(c))
                    .collect();
                parts.join(" \\\\ ")
            },
            AstKind::Matrix(matrix) => self.render_matrix(id, matrix),
            AstKind::Embell(emb) => match embellish::lookup_v5(emb.embell_type) {
                Some(cmd) if embellish::is_prime(cmd) => cmd.to_owned(),
                Some(cmd) => format!(" {} ", cmd),
                None => {
                    log::warn!("no LaTeX mapping for embellishment {}", emb.embell_type);
                    String::new()
                },
            },
            AstKind::Size(_) => String::new(),
        }
    }

    /// Render an ordered child list. A non-prime embellishment combines with
    /// its following sibling (the base the tree builder moved behind it)
    /// into `cmd { base }`; prime-like embellishments attach to whatever
    /// precedes them.
    fn render_run(&self, children: &[NodeId]) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < children.len() {
            if let AstKind::Embell(emb) = self.ast.kind(children[i]) {
                if self.ast.children(children[i]).is_empty() {
                    match embellish::lookup_v5(emb.embell_type) {
                        Some(cmd) if embellish::is_prime(cmd) => out.push_str(cmd),
                        Some(cmd) => {
                            if i + 1 < children.len() {
                                let base = self.render(children[i + 1]);
                                let _ = write!(out, " {} {{ {} }}", cmd, base);
                                i += 2;
                                continue;
                            }
                            let _ = write!(out, " {} ", cmd);
                        },
                        None => {
                            log::warn!(
                                "no LaTeX mapping for embellishment {}",
                                emb.embell_type
                            );
                        },
                    }
                    i += 1;
                    continue;
                }
            }
            out.push_str(&self.render(children[i]));
            i += 1;
        }
        out
    }

    fn render_char(&self, ch: &MtChar) -> String {
        let style = ch.typeface as i32 - 128;
        let mut code = ch.mtcode;
        if code == 0 {
            // Alternate encodings stand in when the MTCode was omitted.
            if ch.bits16 != 0 {
                code = ch.bits16;
            } else if ch.bits8 != 0 {
                code = ch.bits8 as u16;
            }
        }

        let mathmode = style == typeface::MTEXTRA || style == typeface::SPACE;
        let key = if mathmode {
            format!("char/0x{:04x}/mathmode", code)
        } else {
            format!("char/0x{:04x}", code)
        };

        let symbol = char::from_u32(code as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
        let rendered = match self.chars.extended(&key) {
            Some(latex) => latex.to_owned(),
            None => match self.chars.special(symbol) {
                Some(latex) => latex.to_owned(),
                None => symbol.to_string(),
            },
        };

        if style == typeface::TEXT {
            format!("{{ \\rm{{ {} }} }}", rendered)
        } else {
            rendered
        }
    }

    /// Child `n` of a template, or the empty string when the slot is absent.
    fn slot(&self, id: NodeId, n: usize) -> String {
        self.ast
            .children(id)
            .get(n)
            .map(|&c| self.render(c))
            .unwrap_or_default()
    }

    fn render_template(&self, id: NodeId, tmpl: &MtTmpl) -> String {
        match tmpl.selector {
            selector::ANGLE | selector::PAREN | selector::BAR | selector::INTERVAL => {
                let main = self.slot(id, 0);
                let left = self.slot(id, 1);
                let mut right = self.slot(id, 2);
                if tmpl.selector == selector::BAR {
                    // An absent right bar closes the \left with a period.
                    right = if right.is_empty() {
                        ".".to_owned()
                    } else {
                        format!(" {}", right)
                    };
                }
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let left_s = if left.is_empty() {
                    String::new()
                } else {
                    format!("\\left {}", left)
                };
                let right_s = if right.is_empty() {
                    String::new()
                } else {
                    format!("\\right {}", right)
                };
                format!("{} {} {}", left_s, main_s, right_s)
            },
            selector::BRACE => {
                let main = self.slot(id, 0);
                let left = self.slot(id, 1);
                let right = self.slot(id, 2);
                let right = if right.is_empty() {
                    ".".to_owned()
                } else {
                    format!(" {}", right)
                };
                format!(
                    "\\left {} \\begin{{array}}{{l}} {} \\end{{array}} \\right{}",
                    left, main, right
                )
            },
            selector::BRACK => {
                let mut main = self.slot(id, 0);
                if main.is_empty() {
                    main = "\\space".to_owned();
                }
                let left = self.slot(id, 1);
                let right = self.slot(id, 2);
                format!("\\left{} {} \\right{}", left, main, right)
            },
            selector::DBAR => {
                if self.ast.children(id).is_empty() {
                    return String::new();
                }
                format!("\\| {} \\|", self.slot(id, 0))
            },
            selector::FLOOR => {
                if self.ast.children(id).is_empty() {
                    return String::new();
                }
                format!("\\lfloor {} \\rfloor", self.slot(id, 0))
            },
            selector::CEILING => {
                if self.ast.children(id).is_empty() {
                    return String::new();
                }
                format!("\\lceil {} \\rceil", self.slot(id, 0))
            },
            selector::ROOT => {
                format!("\\sqrt[{}] {{ {} }}", self.slot(id, 1), self.slot(id, 0))
            },
            selector::FRACT => {
                let num = self.slot(id, 0);
                if self.ast.children(id).len() < 2 {
                    return format!("\\frac {{ {} }} {{Unknown}}", num);
                }
                format!("\\frac {{ {} }} {{ {} }}", num, self.slot(id, 1))
            },
            selector::UBAR => {
                let main = self.slot(id, 0);
                if main.is_empty() {
                    return "  ".to_owned();
                }
                format!("  {{\\underline{{ {} }}}}  ", main)
            },
            selector::OBAR => {
                let main = self.slot(id, 0);
                if main.is_empty() {
                    return "  ".to_owned();
                }
                if tmpl.variation & TV_BAR_DOUBLE != 0 {
                    format!("  {{\\overline{{\\overline{{ {} }}}}}}  ", main)
                } else {
                    format!("  {{\\overline{{ {} }}}}  ", main)
                }
            },
            selector::ARROW => self.render_arrow(id, tmpl),
            selector::INTEG => {
                let main = self.slot(id, 0);
                let lower = self.slot(id, 1);
                let upper = self.slot(id, 2);
                let symbol = if tmpl.variation & 0x0002 != 0 {
                    "\\iint"
                } else if tmpl.variation & 0x0003 != 0 {
                    "\\iiint"
                } else if tmpl.variation & 0x0004 != 0 {
                    "\\oint"
                } else {
                    "\\int"
                };
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let lower_s = if lower.is_empty() {
                    String::new()
                } else {
                    format!("_{{{}}}", lower)
                };
                let upper_s = if upper.is_empty() {
                    String::new()
                } else {
                    format!("^{{{}}}", upper)
                };
                format!("{}{}{} {}", symbol, lower_s, upper_s, main_s)
            },
            selector::SUM => {
                let main = self.slot(id, 0);
                let lower = self.slot(id, 1);
                let upper = self.slot(id, 2);
                let mut op = self.slot(id, 3);
                if op.is_empty() {
                    op = "\\sum".to_owned();
                }
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let lower_s = if lower.is_empty() {
                    String::new()
                } else {
                    format!("\\limits_{{ {} }}", lower)
                };
                let upper_s = if upper.is_empty() {
                    String::new()
                } else {
                    format!("^ {}", upper)
                };
                format!("{} {} {} {}", op, lower_s, upper_s, main_s)
            },
            selector::PROD => {
                let main = self.slot(id, 0);
                let lower = self.slot(id, 1);
                let upper = self.slot(id, 2);
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let lower_s = if lower.is_empty() {
                    String::new()
                } else {
                    format!("\\limits_{{ {} }}", lower)
                };
                let upper_s = if upper.is_empty() {
                    String::new()
                } else {
                    format!("^{{ {} }}", upper)
                };
                format!("\\prod {}{} {}", lower_s, upper_s, main_s)
            },
            selector::INTOP => {
                let main = self.slot(id, 0);
                let lower = self.slot(id, 1);
                let upper = self.slot(id, 2);
                let mut op = self.slot(id, 3);
                if op.is_empty() {
                    op = "\\bigodot".to_owned();
                }
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let lower_s = if lower.is_empty() {
                    String::new()
                } else {
                    format!("_{{{}}}", lower)
                };
                let upper_s = if upper.is_empty() {
                    String::new()
                } else {
                    format!("^{{{}}}", upper)
                };
                format!("{}{}{} {}", op, lower_s, upper_s, main_s)
            },
            selector::LIM => {
                let main = self.slot(id, 0);
                let lower = self.slot(id, 1);
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("\\mathop {{ {} }}", main)
                };
                let lower_s = if lower.is_empty() {
                    String::new()
                } else {
                    format!("\\limits_{{ {} }}", lower)
                };
                format!("{} {}", main_s, lower_s)
            },
            selector::SUB => {
                let sub = self.slot(id, 0);
                if sub.is_empty() {
                    String::new()
                } else {
                    format!("_{{ {} }}", sub)
                }
            },
            selector::SUP => {
                let sup = self.slot(id, 0);
                if sup.is_empty() {
                    String::new()
                } else {
                    format!("^{{ {} }}", sup)
                }
            },
            selector::SUBSUP => {
                let sub = self.slot(id, 0);
                let sup = self.slot(id, 1);
                let sub_s = if sub.is_empty() {
                    String::new()
                } else {
                    format!("_{{ {} }}", sub)
                };
                let sup_s = if sup.is_empty() {
                    String::new()
                } else {
                    format!("^{{ {} }}", sup)
                };
                format!("{}{}", sub_s, sup_s)
            },
            selector::VEC => {
                let main = self.slot(id, 0);
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let mut accent = String::from("\\overset\\");
                for (bit, name) in [
                    (vec_variation::LEFT, "left"),
                    (vec_variation::RIGHT, "right"),
                    (vec_variation::UNDER, "under"),
                    (vec_variation::HARPOON, "harpoonup"),
                ] {
                    if tmpl.variation & bit != 0 {
                        accent.push_str(name);
                    }
                }
                // Anything below the harpoon bit is an arrow accent.
                if tmpl.variation < vec_variation::HARPOON {
                    accent.push_str("arrow");
                }
                format!("{} {}", accent, main_s)
            },
            selector::TILDE => {
                if self.ast.children(id).is_empty() {
                    return String::new();
                }
                format!("\\tilde{{ {} }}", self.slot(id, 0))
            },
            selector::HAT => {
                let main = self.slot(id, 0);
                let top = self.slot(id, 1);
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let top_s = if top.is_empty() {
                    String::new()
                } else {
                    format!(" {} ", top)
                };
                format!("{} {}", top_s, main_s)
            },
            selector::ARC => {
                let main = self.slot(id, 0);
                let top = self.slot(id, 1);
                let main_s = if main.is_empty() {
                    String::new()
                } else {
                    format!("{{ {} }}", main)
                };
                let top_s = if top.is_empty() {
                    String::new()
                } else {
                    format!("\\overset{{ {} }}", top)
                };
                format!("{} {}", top_s, main_s)
            },
            _ => {
                log::warn!(
                    "template not implemented: selector {} variation {:#06x}",
                    tmpl.selector,
                    tmpl.variation
                );
                let mut out = String::from(TMPL_NOT_IMPLEMENTED);
                for &child in self.ast.children(id) {
                    out.push_str(&self.render(child));
                }
                out
            },
        }
    }

    fn render_arrow(&self, id: NodeId, tmpl: &MtTmpl) -> String {
        let top = self.slot(id, 0);
        let bottom = self.slot(id, 1);
        let top_s = if top.is_empty() {
            String::new()
        } else {
            format!("{{\\mathrm{{ {} }}}}", top)
        };
        let bottom_s = if bottom.is_empty() {
            String::new()
        } else {
            format!("[\\mathrm{{ {} }}]", bottom)
        };

        let double = tmpl.variation & arrow_variation::DOUBLE != 0;
        let harpoon = tmpl.variation & arrow_variation::HARPOON != 0;
        let mut command = String::from("\\x");
        if tmpl.variation & arrow_variation::LEFT != 0 {
            if double || harpoon {
                log::warn!(
                    "arrow variation {:#06x} (double/harpoon, large over small) not implemented",
                    tmpl.variation
                );
            } else {
                command.push_str("leftarrow");
            }
        }
        if tmpl.variation & arrow_variation::RIGHT != 0 {
            if double || harpoon {
                log::warn!(
                    "arrow variation {:#06x} (double/harpoon, small over large) not implemented",
                    tmpl.variation
                );
            } else {
                command.push_str("rightarrow");
            }
        }
        format!("{} {} {}", command, bottom_s, top_s)
    }

    fn render_matrix(&self, id: NodeId, matrix: &MtMatrix) -> String {
        // Cells arrive in row-major order, one line per cell.
        let cells = self.ast.children(id);
        let rows = matrix.rows as usize;
        let cols = matrix.cols as usize;

        let mut body_rows = Vec::with_capacity(rows);
        for r in 0..rows {
            let mut row = Vec::with_capacity(cols);
            for c in 0..cols {
                let rendered = cells
                    .get(r * cols + c)
                    .map(|&cell| self.render(cell))
                    .unwrap_or_default();
                row.push(rendered);
            }
            body_rows.push(row.join(" & "));
        }
        format!(
            " \\begin{{array}} {{}} {} \\end{{array}} ",
            body_rows.join(" \\\\ ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::embell;
    use crate::records::{MtEmbell, MtLine, MtPile, Node};
    use crate::tree::Ast;

    fn line() -> Node {
        Node::Line(MtLine::default())
    }

    fn ch(code: u16) -> Node {
        Node::Char(MtChar {
            mtcode: code,
            typeface: 131,
            ..MtChar::default()
        })
    }

    fn tmpl(selector: u8, variation: u16) -> Node {
        Node::Tmpl(MtTmpl {
            selector,
            variation,
            ..MtTmpl::default()
        })
    }

    fn render(nodes: Vec<Node>) -> String {
        let ast = Ast::build(nodes);
        translate(&ast, 5, &CharTable::new())
    }

    #[test]
    fn fraction_two_slots() {
        let out = render(vec![
            tmpl(selector::FRACT, 0),
            line(),
            ch(b'1' as u16),
            Node::End,
            line(),
            ch(b'2' as u16),
            Node::End,
            Node::End,
        ]);
        assert_eq!(out.trim(), "\\frac { 1 } { 2 }");
    }

    #[test]
    fn fraction_single_slot_fallback() {
        let out = render(vec![
            tmpl(selector::FRACT, 0),
            line(),
            ch(b'1' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(out.contains("\\frac { 1 } {Unknown}"));
    }

    #[test]
    fn sum_defaults_operator() {
        let out = render(vec![
            tmpl(selector::SUM, 0),
            line(),
            ch(b'x' as u16),
            Node::End,
            line(),
            ch(b'k' as u16),
            Node::End,
            line(),
            ch(b'n' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(out.contains("\\sum"));
        assert!(out.contains("\\limits_{ k }"));
        assert!(out.contains("^ n"));
        assert!(out.contains("{ x }"));
    }

    #[test]
    fn integral_symbol_variations() {
        for (variation, symbol) in [(0u16, "\\int"), (2, "\\iint"), (1, "\\iiint"), (4, "\\oint")]
        {
            let out = render(vec![
                tmpl(selector::INTEG, variation),
                line(),
                ch(b'x' as u16),
                Node::End,
                Node::End,
            ]);
            assert!(out.starts_with(symbol), "variation {variation}: {out}");
        }
    }

    #[test]
    fn paren_wrappers_emitted_only_when_present() {
        let out = render(vec![
            tmpl(selector::PAREN, 0),
            line(),
            ch(b'x' as u16),
            Node::End,
            line(),
            ch(b'(' as u16),
            Node::End,
            line(),
            ch(b')' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(out.contains("\\left ("));
        assert!(out.contains("{ x }"));
        assert!(out.contains("\\right )"));

        // No delimiter slots: no \left or \right in the output.
        let bare = render(vec![
            tmpl(selector::PAREN, 0),
            line(),
            ch(b'x' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(!bare.contains("\\left"));
        assert!(!bare.contains("\\right"));
        assert!(bare.contains("{ x }"));
    }

    #[test]
    fn bar_defaults_missing_right_delimiter() {
        let out = render(vec![
            tmpl(selector::BAR, 0),
            line(),
            ch(b'x' as u16),
            Node::End,
            line(),
            ch(b'|' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(out.contains("\\right ."));
    }

    #[test]
    fn scripts_and_subsup() {
        let sup = render(vec![
            tmpl(selector::SUP, 0),
            line(),
            ch(b'2' as u16),
            Node::End,
            Node::End,
        ]);
        assert_eq!(sup, "^{ 2 }");

        let subsup = render(vec![
            tmpl(selector::SUBSUP, 0),
            line(),
            ch(b'i' as u16),
            Node::End,
            line(),
            ch(b'j' as u16),
            Node::End,
            Node::End,
        ]);
        assert_eq!(subsup, "_{ i }^{ j }");
    }

    #[test]
    fn overbar_single_and_double() {
        let single = render(vec![
            tmpl(selector::OBAR, 0),
            line(),
            ch(b'x' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(single.contains("{\\overline{ x }}"));

        let double = render(vec![
            tmpl(selector::OBAR, TV_BAR_DOUBLE),
            line(),
            ch(b'x' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(double.contains("{\\overline{\\overline{ x }}}"));
    }

    #[test]
    fn vec_accent_from_variation_bits() {
        let right = render(vec![
            tmpl(selector::VEC, vec_variation::RIGHT),
            line(),
            ch(b'v' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(right.contains("\\overset\\rightarrow { v }"));

        let harpoon = render(vec![
            tmpl(selector::VEC, vec_variation::RIGHT | vec_variation::HARPOON),
            line(),
            ch(b'v' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(harpoon.contains("\\overset\\rightharpoonup { v }"));
    }

    #[test]
    fn arrow_right_with_slots() {
        let out = render(vec![
            tmpl(selector::ARROW, arrow_variation::RIGHT | arrow_variation::TOP),
            line(),
            ch(b'a' as u16),
            Node::End,
            line(),
            ch(b'b' as u16),
            Node::End,
            Node::End,
        ]);
        assert!(out.contains("\\xrightarrow"));
        assert!(out.contains("[\\mathrm{ b }]"));
        assert!(out.contains("{\\mathrm{ a }}"));
    }

    #[test]
    fn unknown_selector_emits_sentinel() {
        let out = render(vec![tmpl(99, 0), Node::End]);
        assert!(out.contains(TMPL_NOT_IMPLEMENTED));
    }

    #[test]
    fn pile_joins_lines() {
        let out = render(vec![
            Node::Pile(MtPile::default()),
            line(),
            ch(b'a' as u16),
            Node::End,
            line(),
            ch(b'b' as u16),
            Node::End,
            Node::End,
        ]);
        assert_eq!(out, "a \\\\ b");
    }

    #[test]
    fn embellished_char_renders_command_then_braced_base() {
        let out = render(vec![
            line(),
            ch(b'x' as u16),
            Node::Embell(MtEmbell {
                embell_type: embell::HAT,
                ..MtEmbell::default()
            }),
            Node::End,
            Node::End,
        ]);
        assert!(out.contains("\\hat { x }"), "got {out:?}");
        assert!(!out.ends_with("\\hat "), "bare trailing hat in {out:?}");
    }

    #[test]
    fn prime_appends_to_base() {
        let out = render(vec![
            line(),
            ch(b'y' as u16),
            Node::Embell(MtEmbell {
                embell_type: embell::PRIME,
                ..MtEmbell::default()
            }),
            Node::End,
            Node::End,
        ]);
        assert_eq!(out, "y'");
    }

    #[test]
    fn greek_and_text_typefaces() {
        let alpha = render(vec![Node::Char(MtChar {
            mtcode: 0x03B1,
            typeface: 132,
            ..MtChar::default()
        })]);
        assert_eq!(alpha, "\\alpha ");

        let text = render(vec![Node::Char(MtChar {
            mtcode: b'a' as u16,
            typeface: 129,
            ..MtChar::default()
        })]);
        assert_eq!(text, "{ \\rm{ a } }");
    }

    #[test]
    fn mtextra_uses_mathmode_key() {
        let out = render(vec![Node::Char(MtChar {
            mtcode: 0x22EF,
            typeface: 139,
            ..MtChar::default()
        })]);
        assert_eq!(out, "\\cdots ");
    }
}
