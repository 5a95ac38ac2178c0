//! Character translation tables.
//!
//! Glyph lookup is a two-level affair: the renderer first builds a key of
//! the form `char/0x{code:04x}`, suffixed with `/mathmode` when the glyph
//! comes from the MT Extra or space styles, and queries the extended table;
//! on a miss it falls back to the special-symbol table keyed by the raw
//! character, and finally to the character itself.
//!
//! [`CharTable`] carries caller-supplied entries layered over the built-in
//! maps, so producers with unusual font encodings can be accommodated
//! without touching the crate.

use std::collections::HashMap;

use phf::phf_map;

/// Built-in MTCode → LaTeX table. Keys follow `char/0x{code:04x}` with an
/// optional `/mathmode` suffix for glyphs of the MT Extra and space styles.
static EXTENDED_CHARS: phf::Map<&'static str, &'static str> = phf_map! {
    // Lowercase Greek.
    "char/0x03b1" => "\\alpha ",
    "char/0x03b2" => "\\beta ",
    "char/0x03b3" => "\\gamma ",
    "char/0x03b4" => "\\delta ",
    "char/0x03b5" => "\\varepsilon ",
    "char/0x03b6" => "\\zeta ",
    "char/0x03b7" => "\\eta ",
    "char/0x03b8" => "\\theta ",
    "char/0x03b9" => "\\iota ",
    "char/0x03ba" => "\\kappa ",
    "char/0x03bb" => "\\lambda ",
    "char/0x03bc" => "\\mu ",
    "char/0x03bd" => "\\nu ",
    "char/0x03be" => "\\xi ",
    "char/0x03bf" => "o",
    "char/0x03c0" => "\\pi ",
    "char/0x03c1" => "\\rho ",
    "char/0x03c2" => "\\varsigma ",
    "char/0x03c3" => "\\sigma ",
    "char/0x03c4" => "\\tau ",
    "char/0x03c5" => "\\upsilon ",
    "char/0x03c6" => "\\varphi ",
    "char/0x03c7" => "\\chi ",
    "char/0x03c8" => "\\psi ",
    "char/0x03c9" => "\\omega ",
    "char/0x03d1" => "\\vartheta ",
    "char/0x03d5" => "\\phi ",
    "char/0x03d6" => "\\varpi ",
    "char/0x03f5" => "\\epsilon ",
    // Uppercase Greek with distinct shapes.
    "char/0x0393" => "\\Gamma ",
    "char/0x0394" => "\\Delta ",
    "char/0x0398" => "\\Theta ",
    "char/0x039b" => "\\Lambda ",
    "char/0x039e" => "\\Xi ",
    "char/0x03a0" => "\\Pi ",
    "char/0x03a3" => "\\Sigma ",
    "char/0x03a5" => "\\Upsilon ",
    "char/0x03a6" => "\\Phi ",
    "char/0x03a8" => "\\Psi ",
    "char/0x03a9" => "\\Omega ",
    // Binary operators.
    "char/0x00b1" => "\\pm ",
    "char/0x2213" => "\\mp ",
    "char/0x00d7" => "\\times ",
    "char/0x00f7" => "\\div ",
    "char/0x22c5" => "\\cdot ",
    "char/0x2218" => "\\circ ",
    "char/0x2219" => "\\bullet ",
    "char/0x2295" => "\\oplus ",
    "char/0x2296" => "\\ominus ",
    "char/0x2297" => "\\otimes ",
    "char/0x2298" => "\\oslash ",
    "char/0x2299" => "\\odot ",
    "char/0x2227" => "\\wedge ",
    "char/0x2228" => "\\vee ",
    "char/0x222a" => "\\cup ",
    "char/0x2229" => "\\cap ",
    // Relations.
    "char/0x2264" => "\\le ",
    "char/0x2265" => "\\ge ",
    "char/0x2260" => "\\ne ",
    "char/0x2248" => "\\approx ",
    "char/0x2261" => "\\equiv ",
    "char/0x223c" => "\\sim ",
    "char/0x2245" => "\\cong ",
    "char/0x221d" => "\\propto ",
    "char/0x226a" => "\\ll ",
    "char/0x226b" => "\\gg ",
    "char/0x2282" => "\\subset ",
    "char/0x2283" => "\\supset ",
    "char/0x2286" => "\\subseteq ",
    "char/0x2287" => "\\supseteq ",
    "char/0x2208" => "\\in ",
    "char/0x2209" => "\\notin ",
    "char/0x220b" => "\\ni ",
    "char/0x22a5" => "\\perp ",
    "char/0x2225" => "\\parallel ",
    "char/0x2223" => "\\mid ",
    // Logic and set symbols.
    "char/0x2200" => "\\forall ",
    "char/0x2203" => "\\exists ",
    "char/0x00ac" => "\\neg ",
    "char/0x2205" => "\\emptyset ",
    "char/0x2234" => "\\therefore ",
    "char/0x2235" => "\\because ",
    "char/0x2135" => "\\aleph ",
    // Arrows.
    "char/0x2190" => "\\leftarrow ",
    "char/0x2191" => "\\uparrow ",
    "char/0x2192" => "\\rightarrow ",
    "char/0x2193" => "\\downarrow ",
    "char/0x2194" => "\\leftrightarrow ",
    "char/0x21d0" => "\\Leftarrow ",
    "char/0x21d2" => "\\Rightarrow ",
    "char/0x21d4" => "\\Leftrightarrow ",
    "char/0x21a6" => "\\mapsto ",
    // Big operators and calculus.
    "char/0x2211" => "\\sum ",
    "char/0x220f" => "\\prod ",
    "char/0x2210" => "\\coprod ",
    "char/0x222b" => "\\int ",
    "char/0x222c" => "\\iint ",
    "char/0x222d" => "\\iiint ",
    "char/0x222e" => "\\oint ",
    "char/0x22c2" => "\\bigcap ",
    "char/0x22c3" => "\\bigcup ",
    "char/0x2202" => "\\partial ",
    "char/0x2207" => "\\nabla ",
    "char/0x221a" => "\\surd ",
    "char/0x221e" => "\\infty ",
    "char/0x2220" => "\\angle ",
    "char/0x2032" => "'",
    "char/0x2033" => "''",
    "char/0x00b0" => "^\\circ ",
    // Dots and blackboard glyphs from the MT Extra font.
    "char/0x2026/mathmode" => "\\ldots ",
    "char/0x22ef/mathmode" => "\\cdots ",
    "char/0x22ee/mathmode" => "\\vdots ",
    "char/0x22f1/mathmode" => "\\ddots ",
    "char/0x210f/mathmode" => "\\hbar ",
    "char/0x2113/mathmode" => "\\ell ",
    "char/0x2111/mathmode" => "\\Im ",
    "char/0x211c/mathmode" => "\\Re ",
    "char/0x2118/mathmode" => "\\wp ",
    "char/0x2026" => "\\ldots ",
    "char/0x22ef" => "\\cdots ",
    "char/0x22ee" => "\\vdots ",
    "char/0x22f1" => "\\ddots ",
    "char/0x210f" => "\\hbar ",
    "char/0x2113" => "\\ell ",
    "char/0x2111" => "\\Im ",
    "char/0x211c" => "\\Re ",
    "char/0x2118" => "\\wp ",
    // Spacing glyphs from the space style.
    "char/0x2002/mathmode" => "\\;",
    "char/0x2003/mathmode" => "\\quad ",
    "char/0x2004/mathmode" => "\\;",
    "char/0x2005/mathmode" => "\\:",
    "char/0x2009/mathmode" => "\\,",
    "char/0x200a/mathmode" => "\\,",
    "char/0x200b/mathmode" => "",
    "char/0x00a0/mathmode" => "\\ ",
};

/// Built-in fallback table keyed by the raw character: LaTeX-reserved ASCII
/// plus symbols a producer may emit with a plain typeface.
static SPECIAL_CHARS: phf::Map<char, &'static str> = phf_map! {
    '{' => "\\{",
    '}' => "\\}",
    '%' => "\\%",
    '&' => "\\&",
    '#' => "\\#",
    '$' => "\\$",
    '_' => "\\_",
    '~' => "\\sim ",
    '±' => "\\pm ",
    '×' => "\\times ",
    '÷' => "\\div ",
    '≤' => "\\le ",
    '≥' => "\\ge ",
    '≠' => "\\ne ",
    '≈' => "\\approx ",
    '∞' => "\\infty ",
    '→' => "\\rightarrow ",
    '←' => "\\leftarrow ",
    '∂' => "\\partial ",
    '∇' => "\\nabla ",
    '∈' => "\\in ",
    '∑' => "\\sum ",
    '∏' => "\\prod ",
    '∫' => "\\int ",
    '°' => "^\\circ ",
};

/// Read-only character mappings consulted by the renderer, with optional
/// caller-supplied entries layered over the built-ins.
#[derive(Debug, Clone, Default)]
pub struct CharTable {
    extended: HashMap<String, String>,
    special: HashMap<char, String>,
}

impl CharTable {
    /// Table with only the built-in mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with caller-supplied mappings layered over the built-ins.
    /// Extended keys follow `char/0x{code:04x}` with an optional
    /// `/mathmode` suffix.
    pub fn with_tables(extended: HashMap<String, String>, special: HashMap<char, String>) -> Self {
        Self { extended, special }
    }

    /// Add or override a single extended-character mapping.
    pub fn insert_extended(&mut self, key: impl Into<String>, latex: impl Into<String>) {
        self.extended.insert(key.into(), latex.into());
    }

    /// Add or override a single special-symbol mapping.
    pub fn insert_special(&mut self, symbol: char, latex: impl Into<String>) {
        self.special.insert(symbol, latex.into());
    }

    pub(crate) fn extended(&self, key: &str) -> Option<&str> {
        self.extended
            .get(key)
            .map(String::as_str)
            .or_else(|| EXTENDED_CHARS.get(key).copied())
    }

    pub(crate) fn special(&self, symbol: char) -> Option<&str> {
        self.special
            .get(&symbol)
            .map(String::as_str)
            .or_else(|| SPECIAL_CHARS.get(&symbol).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_extended_lookup() {
        let table = CharTable::new();
        assert_eq!(table.extended("char/0x03b1"), Some("\\alpha "));
        assert_eq!(table.extended("char/0x2264"), Some("\\le "));
        assert_eq!(table.extended("char/0xffff"), None);
    }

    #[test]
    fn mathmode_suffix_selects_mt_extra_entries() {
        let table = CharTable::new();
        assert_eq!(table.extended("char/0x22ef/mathmode"), Some("\\cdots "));
        assert_eq!(table.extended("char/0x2009/mathmode"), Some("\\,"));
    }

    #[test]
    fn builtin_special_lookup() {
        let table = CharTable::new();
        assert_eq!(table.special('{'), Some("\\{"));
        assert_eq!(table.special('∞'), Some("\\infty "));
        assert_eq!(table.special('x'), None);
    }

    #[test]
    fn injected_entries_shadow_builtins() {
        let mut table = CharTable::new();
        table.insert_extended("char/0x03b1", "\\upalpha ");
        table.insert_special('~', "\\textasciitilde ");
        assert_eq!(table.extended("char/0x03b1"), Some("\\upalpha "));
        assert_eq!(table.special('~'), Some("\\textasciitilde "));
        // Untouched keys still resolve through the built-ins.
        assert_eq!(table.extended("char/0x03b2"), Some("\\beta "));
    }
}
