//! MTEF constants: record tags, option flags, typefaces, template selectors
//! and embellishment codes.
//!
//! MTEF 5 records carry a full type byte followed by an option byte; MTEF 3
//! packs the record type into the low nibble of a single tag byte and the
//! option flags into the high nibble. The tag numbering itself is shared
//! between the versions for the record kinds both define.

use bitflags::bitflags;

/// Record tags. In MTEF 3 only values 0 through 14 occur (7 is RULER and
/// 8 is the FONT record); MTEF 5 extends the set through ENCODING_DEF and
/// reserves everything at or above FUTURE for length-prefixed expansion
/// records.
pub mod tag {
    pub const END: u8 = 0;
    pub const LINE: u8 = 1;
    pub const CHAR: u8 = 2;
    pub const TMPL: u8 = 3;
    pub const PILE: u8 = 4;
    pub const MATRIX: u8 = 5;
    pub const EMBELL: u8 = 6;
    pub const RULER: u8 = 7;
    pub const FONT_STYLE_DEF: u8 = 8;
    pub const SIZE: u8 = 9;
    pub const FULL: u8 = 10;
    pub const SUB: u8 = 11;
    pub const SUB2: u8 = 12;
    pub const SYM: u8 = 13;
    pub const SUBSYM: u8 = 14;
    pub const COLOR: u8 = 15;
    pub const COLOR_DEF: u8 = 16;
    pub const FONT_DEF: u8 = 17;
    pub const EQN_PREFS: u8 = 18;
    pub const ENCODING_DEF: u8 = 19;
    /// Records at or above this value carry a one-byte skip length.
    pub const FUTURE: u8 = 100;
}

bitflags! {
    /// Option byte on v5 LINE records. The same bit layout appears in the
    /// high nibble of v3 LINE tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineOptions: u8 {
        /// Line is a placeholder only; does not open a container.
        const NULL = 0x01;
        /// A RULER record follows.
        const RULER = 0x02;
        /// A line-spacing byte follows.
        const LSPACE = 0x04;
        /// Nudge values follow the tag.
        const NUDGE = 0x08;
    }

    /// Option byte on v5 CHAR records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharOptions: u8 {
        /// An embellishment list follows the character.
        const EMBELL = 0x01;
        /// Character starts a function (sin, cos, ...).
        const FUNC_START = 0x02;
        /// An 8-bit font position follows.
        const ENC_CHAR8 = 0x04;
        const NUDGE = 0x08;
        /// A 16-bit font position follows.
        const ENC_CHAR16 = 0x10;
        /// The 16-bit MTCode value is absent.
        const ENC_NO_MTCODE = 0x20;
    }

    /// Option byte on v5 TMPL, PILE, MATRIX and EMBELL records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StructOptions: u8 {
        const RULER = 0x02;
        const NUDGE = 0x08;
    }

    /// High-nibble flags on v3 CHAR tags. Nudge shares the 0x8 bit with the
    /// other record kinds but the low bits differ from v5.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct V3CharOptions: u8 {
        const AUTO = 0x01;
        const EMBELL = 0x02;
        const NUDGE = 0x08;
    }

    /// Option byte on COLOR_DEF records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorDefOptions: u8 {
        /// Color model is CMYK (four components), else RGB (three).
        const CMYK = 0x01;
        const SPOT = 0x02;
        /// A null-terminated color name follows the components.
        const NAME = 0x04;
    }
}

/// MathType style indices carried in CHAR typeface values (biased by 128;
/// positive after unbiasing means a style, negative an explicit font).
pub mod typeface {
    pub const TEXT: i32 = 1;
    pub const FUNCTION: i32 = 2;
    pub const VARIABLE: i32 = 3;
    pub const LCGREEK: i32 = 4;
    pub const UCGREEK: i32 = 5;
    pub const SYMBOL: i32 = 6;
    pub const VECTOR: i32 = 7;
    pub const NUMBER: i32 = 8;
    pub const USER1: i32 = 9;
    pub const USER2: i32 = 10;
    pub const MTEXTRA: i32 = 11;
    pub const TEXT_FE: i32 = 12;
    pub const EXPAND: i32 = 22;
    pub const MARKER: i32 = 23;
    pub const SPACE: i32 = 24;
}

/// Template selectors, MTEF 5 numbering.
pub mod selector {
    pub const ANGLE: u8 = 0;
    pub const PAREN: u8 = 1;
    pub const BRACE: u8 = 2;
    pub const BRACK: u8 = 3;
    pub const BAR: u8 = 4;
    pub const DBAR: u8 = 5;
    pub const FLOOR: u8 = 6;
    pub const CEILING: u8 = 7;
    pub const OBRACK: u8 = 8;
    pub const INTERVAL: u8 = 9;
    pub const ROOT: u8 = 10;
    pub const FRACT: u8 = 11;
    pub const UBAR: u8 = 12;
    pub const OBAR: u8 = 13;
    pub const ARROW: u8 = 14;
    pub const INTEG: u8 = 15;
    pub const SUM: u8 = 16;
    pub const PROD: u8 = 17;
    pub const COPROD: u8 = 18;
    pub const UNION: u8 = 19;
    pub const INTER: u8 = 20;
    pub const INTOP: u8 = 21;
    pub const SUMOP: u8 = 22;
    pub const LIM: u8 = 23;
    pub const HBRACE: u8 = 24;
    pub const HBRACK: u8 = 25;
    pub const LDIV: u8 = 26;
    pub const SUB: u8 = 27;
    pub const SUP: u8 = 28;
    pub const SUBSUP: u8 = 29;
    pub const DIRAC: u8 = 30;
    pub const VEC: u8 = 31;
    pub const TILDE: u8 = 32;
    pub const HAT: u8 = 33;
    pub const ARC: u8 = 34;
}

/// Template selectors, MTEF 3 numbering.
pub mod selector_v3 {
    pub const ANGLE: u8 = 0;
    pub const PAREN: u8 = 1;
    pub const BRACE: u8 = 2;
    pub const BRACK: u8 = 3;
    pub const BAR: u8 = 4;
    pub const DBAR: u8 = 5;
    pub const FLOOR: u8 = 6;
    pub const CEILING: u8 = 7;
    pub const LDIV: u8 = 8;
    pub const SLFRACT: u8 = 9;
    pub const ROOT: u8 = 10;
    pub const FRACT: u8 = 11;
    pub const SCRIPT: u8 = 12;
    pub const UBAR: u8 = 13;
    pub const OBAR: u8 = 14;
    pub const LARROW: u8 = 15;
    pub const RARROW: u8 = 16;
    pub const BARROW: u8 = 17;
    pub const SINT: u8 = 18;
    pub const DINT: u8 = 19;
    pub const TINT: u8 = 20;
    pub const SSINT: u8 = 21;
    pub const DSINT: u8 = 22;
    pub const TSINT: u8 = 23;
    pub const UHBRACE: u8 = 24;
    pub const LHBRACE: u8 = 25;
    pub const SUM: u8 = 26;
    pub const ISUM: u8 = 27;
    pub const PROD: u8 = 28;
    pub const IPROD: u8 = 29;
    pub const COPROD: u8 = 30;
    pub const ICOPROD: u8 = 31;
    pub const UNION: u8 = 32;
    pub const IUNION: u8 = 33;
    pub const INTER: u8 = 34;
    pub const IINTER: u8 = 35;
    pub const LIM: u8 = 36;
    pub const LSCRIPT: u8 = 37;
}

/// Embellishment codes. The 2..=20 range is shared between v3 and v5; the
/// underscript and strike variants exist in v5 only.
pub mod embell {
    pub const DOT: u8 = 2;
    pub const DDOT: u8 = 3;
    pub const TDOT: u8 = 4;
    pub const PRIME: u8 = 5;
    pub const DPRIME: u8 = 6;
    pub const BPRIME: u8 = 7;
    pub const TILDE: u8 = 8;
    pub const HAT: u8 = 9;
    pub const NOT: u8 = 10;
    pub const RARROW: u8 = 11;
    pub const LARROW: u8 = 12;
    pub const BARROW: u8 = 13;
    pub const R1ARROW: u8 = 14;
    pub const L1ARROW: u8 = 15;
    pub const MBAR: u8 = 16;
    pub const OBAR: u8 = 17;
    pub const TPRIME: u8 = 18;
    pub const FROWN: u8 = 19;
    pub const SMILE: u8 = 20;
    pub const X_BARS: u8 = 21;
    pub const UP_BAR: u8 = 22;
    pub const DOWN_BAR: u8 = 23;
    pub const QDOT: u8 = 24;
    pub const U_1DOT: u8 = 25;
    pub const U_2DOT: u8 = 26;
    pub const U_3DOT: u8 = 27;
    pub const U_4DOT: u8 = 28;
    pub const U_BAR: u8 = 29;
    pub const U_TILDE: u8 = 30;
    pub const U_FROWN: u8 = 31;
    pub const U_SMILE: u8 = 32;
    pub const U_RARROW: u8 = 33;
    pub const U_LARROW: u8 = 34;
    pub const U_BARROW: u8 = 35;
    pub const U_R1ARROW: u8 = 36;
    pub const U_L1ARROW: u8 = 37;
}

/// ARROW template variation bits.
pub mod arrow_variation {
    pub const DOUBLE: u16 = 0x0001;
    pub const HARPOON: u16 = 0x0002;
    pub const TOP: u16 = 0x0004;
    pub const BOTTOM: u16 = 0x0008;
    /// Points left for single arrows; large-over-small for double/harpoon.
    pub const LEFT: u16 = 0x0010;
    /// Points right for single arrows; small-over-large for double/harpoon.
    pub const RIGHT: u16 = 0x0020;
}

/// VEC template variation bits.
pub mod vec_variation {
    pub const LEFT: u16 = 0x0001;
    pub const RIGHT: u16 = 0x0002;
    pub const UNDER: u16 = 0x0004;
    pub const HARPOON: u16 = 0x0008;
}

/// OBAR template variation: double rule.
pub const TV_BAR_DOUBLE: u16 = 0x0001;
