//! MTEF 3 rendering.
//!
//! The v3 selector space differs from v5 (scripts share one selector
//! refined by variation, integral kinds get selectors of their own) and the
//! character path is simpler: glyph codes are emitted directly rather than
//! through the lookup tables.

use super::embellish;
use crate::charset::CharTable;
use crate::constants::selector_v3;
use crate::records::{MtChar, MtMatrix, MtTmpl};
use crate::tree::{Ast, AstKind, NodeId};

pub(super) struct V3Emitter<'a> {
    pub ast: &'a Ast,
    #[allow(dead_code)]
    pub chars: &'a CharTable,
}

impl V3Emitter<'_> {
    pub fn render(&self, id: NodeId) -> String {
        match self.ast.kind(id) {
            AstKind::Root => self.render_run(self.ast.children(id)),
            AstKind::Line(line) => {
                if line.null {
                    String::new()
                } else {
                    self.render_run(self.ast.children(id))
                }
            },
            AstKind::Char(ch) => Self::render_char(ch),
            AstKind::Tmpl(tmpl) => self.render_template(id, tmpl),
            AstKind::Pile(_) => self.render_pile(id),
            AstKind::Matrix(matrix) => self.render_matrix(id, matrix),
            AstKind::Embell(emb) => self.render_embell(id, emb.embell_type),
            AstKind::Size(_) => String::new(),
        }
    }

    fn render_char(ch: &MtChar) -> String {
        match char::from_u32(ch.mtcode as u32) {
            Some(c) => c.to_string(),
            None => format!("\\text{{{}}}", ch.mtcode),
        }
    }

    /// Concatenate a child list, folding childless embellishments onto their
    /// neighbors: primes attach to the preceding base, everything else wraps
    /// the following sibling.
    fn render_run(&self, children: &[NodeId]) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < children.len() {
            if let AstKind::Embell(emb) = self.ast.kind(children[i]) {
                if self.ast.children(children[i]).is_empty() {
                    match embellish::lookup_v3(emb.embell_type) {
                        Some(cmd) if embellish::is_prime(cmd) => out.push_str(cmd),
                        Some(cmd) => {
                            if i + 1 < children.len() {
                                let base = self.render(children[i + 1]);
                                out.push_str(&format!("{}{{{}}}", cmd, base));
                                i += 2;
                                continue;
                            }
                            out.push_str(cmd);
                        },
                        None => {
                            log::warn!(
                                "no LaTeX mapping for v3 embellishment {}",
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

    fn slot(&self, id: NodeId, n: usize) -> String {
        self.ast
            .children(id)
            .get(n)
            .map(|&c| self.render(c))
            .unwrap_or_default()
    }

    /// First child whose rendering is non-blank; scripts in v3 streams often
    /// lead with an empty placeholder slot.
    fn first_filled_child(&self, id: NodeId) -> String {
        for &child in self.ast.children(id) {
            let rendered = self.render(child);
            if !rendered.trim().is_empty() {
                return rendered;
            }
        }
        String::new()
    }

    fn render_children(&self, id: NodeId) -> String {
        self.render_run(self.ast.children(id))
    }

    fn render_template(&self, id: NodeId, tmpl: &MtTmpl) -> String {
        let children = self.ast.children(id);
        match tmpl.selector {
            selector_v3::FRACT if children.len() >= 2 => {
                format!("\\frac{{{}}}{{{}}}", self.slot(id, 0), self.slot(id, 1))
            },
            selector_v3::SINT if tmpl.variation <= 4 => {
                let main = self.render_children(id);
                match tmpl.variation {
                    // Contour forms.
                    3 | 4 => format!("\\oint {}", main),
                    _ => format!("\\int {}", main),
                }
            },
            selector_v3::SCRIPT => match tmpl.variation {
                0 => format!("^{{{}}}", self.first_filled_child(id)),
                1 => format!("_{{{}}}", self.first_filled_child(id)),
                2 if children.len() >= 2 => {
                    format!("_{{{}}}^{{{}}}", self.slot(id, 0), self.slot(id, 1))
                },
                _ => self.render_children(id),
            },
            selector_v3::ROOT => match tmpl.variation {
                0 if !children.is_empty() => format!("\\sqrt{{{}}}", self.slot(id, 0)),
                1 if children.len() >= 2 => {
                    format!("\\sqrt[{}]{{{}}}", self.slot(id, 1), self.slot(id, 0))
                },
                _ => self.render_children(id),
            },
            selector_v3::PAREN if !children.is_empty() => {
                let content = self.slot(id, 0);
                match tmpl.variation {
                    0 => format!("\\left({}\\right)", content),
                    1 => format!("\\left({}\\right.", content),
                    2 => format!("\\left.{}\\right)", content),
                    _ => self.render_children(id),
                }
            },
            selector_v3::BRACK if !children.is_empty() => {
                let content = self.slot(id, 0);
                match tmpl.variation {
                    0 => format!("\\left[{}\\right]", content),
                    1 => format!("\\left[{}\\right.", content),
                    2 => format!("\\left.{}\\right]", content),
                    _ => self.render_children(id),
                }
            },
            selector_v3::BRACE if !children.is_empty() => {
                let content = self.slot(id, 0);
                match tmpl.variation {
                    0 => format!("\\left\\{{{}\\right\\}}", content),
                    1 => format!("\\left\\{{{}\\right.", content),
                    2 => format!("\\left.{}\\right\\}}", content),
                    _ => self.render_children(id),
                }
            },
            selector_v3::SUM => self.render_big_op(id, tmpl, "\\sum"),
            selector_v3::PROD => self.render_big_op(id, tmpl, "\\prod"),
            selector_v3::LSCRIPT => match tmpl.variation {
                0 => format!("{{}}^{{{}}}", self.first_filled_child(id)),
                1 => format!("{{}}_{{{}}}", self.first_filled_child(id)),
                2 if children.len() >= 2 => {
                    format!("{{}}_{{{}}}^{{{}}}", self.slot(id, 0), self.slot(id, 1))
                },
                _ => self.render_children(id),
            },
            _ => self.render_children(id),
        }
    }

    /// Slot order in v3 big operators is main, upper, lower.
    fn render_big_op(&self, id: NodeId, tmpl: &MtTmpl, symbol: &str) -> String {
        let main = self.slot(id, 0);
        let upper = self.slot(id, 1);
        let lower = self.slot(id, 2);
        match tmpl.variation {
            0 => format!("{}_{{{}}} {}", symbol, lower, main),
            1 => format!("{}_{{{}}}^{{{}}} {}", symbol, lower, upper, main),
            2 => format!("{} {}", symbol, main),
            _ => self.render_children(id),
        }
    }

    fn render_pile(&self, id: NodeId) -> String {
        let mut parts: Vec<String> = Vec::new();
        let children = self.ast.children(id);
        for (i, &child) in children.iter().enumerate() {
            let rendered = self.render(child);
            if !rendered.is_empty() {
                parts.push(rendered);
                if i < children.len() - 1 {
                    parts.push("\\\\".to_owned());
                }
            }
        }
        if parts.len() > 1 {
            format!("\\begin{{aligned}} {} \\end{{aligned}}", parts.join(" "))
        } else {
            parts.concat()
        }
    }

    fn render_matrix(&self, id: NodeId, matrix: &MtMatrix) -> String {
        let cells = self.ast.children(id);
        let rows = matrix.rows as usize;
        let cols = matrix.cols as usize;
        let mut out = String::from("\\begin{pmatrix}");
        for r in 0..rows {
            let row: Vec<String> = (0..cols)
                .map(|c| {
                    cells
                        .get(r * cols + c)
                        .map(|&cell| self.render(cell))
                        .unwrap_or_default()
                })
                .collect();
            out.push_str(&row.join(" & "));
            if r + 1 < rows {
                out.push_str(" \\\\ ");
            }
        }
        out.push_str("\\end{pmatrix}");
        out
    }

    /// Embellishment that captured its base as a child (the general v3
    /// shape); childless embellishments are folded by `render_run` instead.
    fn render_embell(&self, id: NodeId, code: u8) -> String {
        let children = self.ast.children(id);
        match embellish::lookup_v3(code) {
            Some(cmd) => {
                if children.is_empty() {
                    return String::new();
                }
                let base = self.render(children[0]);
                if embellish::is_prime(cmd) {
                    format!("{}{}", base, cmd)
                } else {
                    format!("{}{{{}}}", cmd, base)
                }
            },
            None => {
                log::warn!("no LaTeX mapping for v3 embellishment {}", code);
                if children.is_empty() {
                    String::new()
                } else {
                    self.render(children[0])
                }
            },
        }
    }
}
