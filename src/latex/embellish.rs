//! Embellishment code → LaTeX command tables.
//!
//! Prime-like entries (values starting with `'`) are appended directly to
//! the base they decorate; every other entry renders as a standalone command
//! applied to a braced base. A lookup miss emits nothing and is logged by
//! the renderer.

use phf::phf_map;

/// MTEF 5 embellishments, including the underscript set.
static EMBELL_LATEX_V5: phf::Map<u8, &'static str> = phf_map! {
    2u8 => "\\dot",
    3u8 => "\\ddot",
    4u8 => "\\dddot",
    5u8 => "'",
    6u8 => "''",
    7u8 => "^\\backprime",
    8u8 => "\\tilde",
    9u8 => "\\hat",
    10u8 => "\\not",
    11u8 => "\\overrightarrow",
    12u8 => "\\overleftarrow",
    13u8 => "\\overleftrightarrow",
    // Harpoon-tipped arrows fall back to the plain forms.
    14u8 => "\\overrightarrow",
    15u8 => "\\overleftarrow",
    16u8 => "\\overline",
    17u8 => "\\overline",
    18u8 => "'''",
    19u8 => "\\frown",
    20u8 => "\\smile",
    21u8 => "\\cancel",
    22u8 => "\\nearrow",
    23u8 => "\\searrow",
    24u8 => "\\ddddot",
    25u8 => "\\underdot",
    26u8 => "\\underddot",
    27u8 => "\\underdddot",
    28u8 => "\\underddddot",
    29u8 => "\\underline",
    30u8 => "\\undertilde",
    31u8 => "\\underfrown",
    32u8 => "\\undersmile",
    33u8 => "\\underrightarrow",
    34u8 => "\\underleftarrow",
    35u8 => "\\underleftrightarrow",
    36u8 => "\\underrightarrow",
    37u8 => "\\underleftarrow",
};

/// MTEF 3 embellishments: the shared 2..=20 range only.
static EMBELL_LATEX_V3: phf::Map<u8, &'static str> = phf_map! {
    2u8 => "\\dot",
    3u8 => "\\ddot",
    4u8 => "\\dddot",
    5u8 => "'",
    6u8 => "''",
    7u8 => "^\\backprime",
    8u8 => "\\tilde",
    9u8 => "\\hat",
    10u8 => "\\not",
    11u8 => "\\overrightarrow",
    12u8 => "\\overleftarrow",
    13u8 => "\\overleftrightarrow",
    14u8 => "\\overrightarrow",
    15u8 => "\\overleftarrow",
    16u8 => "\\overline",
    17u8 => "\\overline",
    18u8 => "'''",
    19u8 => "\\frown",
    20u8 => "\\smile",
};

pub(crate) fn lookup_v5(code: u8) -> Option<&'static str> {
    EMBELL_LATEX_V5.get(&code).copied()
}

pub(crate) fn lookup_v3(code: u8) -> Option<&'static str> {
    EMBELL_LATEX_V3.get(&code).copied()
}

/// Prime-like decorations attach to the base without bracing.
pub(crate) fn is_prime(latex: &str) -> bool {
    latex.starts_with('\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::embell;

    #[test]
    fn shared_codes_agree_between_versions() {
        for code in 2u8..=20 {
            assert_eq!(lookup_v3(code), lookup_v5(code), "code {code}");
        }
    }

    #[test]
    fn dots_and_hats() {
        assert_eq!(lookup_v5(embell::DOT), Some("\\dot"));
        assert_eq!(lookup_v5(embell::HAT), Some("\\hat"));
        assert_eq!(lookup_v5(embell::OBAR), Some("\\overline"));
        assert_eq!(lookup_v5(embell::QDOT), Some("\\ddddot"));
    }

    #[test]
    fn primes_are_detected() {
        assert!(is_prime(lookup_v5(embell::PRIME).unwrap()));
        assert!(is_prime(lookup_v5(embell::DPRIME).unwrap()));
        assert!(is_prime(lookup_v5(embell::TPRIME).unwrap()));
        assert!(!is_prime(lookup_v5(embell::BPRIME).unwrap()));
        assert!(!is_prime(lookup_v5(embell::HAT).unwrap()));
    }

    #[test]
    fn underscripts_are_v5_only() {
        assert_eq!(lookup_v5(embell::U_BAR), Some("\\underline"));
        assert_eq!(lookup_v3(embell::U_BAR), None);
        assert_eq!(lookup_v3(embell::X_BARS), None);
    }

    #[test]
    fn unknown_code_misses() {
        assert_eq!(lookup_v5(0), None);
        assert_eq!(lookup_v5(200), None);
    }
}
