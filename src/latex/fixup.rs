//! Post-processing pass that collapses adjacent script groups.
//!
//! Producers emit runs like `x_1_2` or `x^{a}^{b}` where a single script
//! group is meant. Four rewrite rules run repeatedly until the string stops
//! changing, which also makes the whole pass idempotent: each application
//! removes one script marker, so a fixed point always exists.

use once_cell::sync::Lazy;
use regex::Regex;

static SUB_BRACED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_\{\s*([^}]+)\s*\}\s*_\{\s*([^}]+)\s*\}").expect("subscript group pattern")
});
static SUB_SIMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_([^_^{}\s\\])\s*_([^_^{}\s\\])").expect("subscript atom pattern")
});
static SUP_BRACED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\^\{\s*([^}]+)\s*\}\s*\^\{\s*([^}]+)\s*\}").expect("superscript group pattern")
});
static SUP_SIMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\^([^_^{}\s\\])\s*\^([^_^{}\s\\])").expect("superscript atom pattern")
});

/// Merge consecutive subscript and superscript groups until stable.
pub(crate) fn fix_consecutive_scripts(latex: &str) -> String {
    let mut current = latex.to_owned();
    loop {
        let mut next = collapse(&SUB_BRACED, "_{${1} ${2}}", &current);
        next = collapse(&SUB_SIMPLE, "_{${1}${2}}", &next);
        next = collapse(&SUP_BRACED, "^{${1} ${2}}", &next);
        next = collapse(&SUP_SIMPLE, "^{${1}${2}}", &next);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse(re: &Regex, replacement: &str, input: &str) -> String {
    let mut current = input.to_owned();
    while re.is_match(&current) {
        current = re.replace_all(&current, replacement).into_owned();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_simple_subscripts() {
        assert_eq!(fix_consecutive_scripts("x_1_2"), "x_{12}");
    }

    #[test]
    fn merges_braced_superscripts() {
        assert_eq!(fix_consecutive_scripts("x^{a}^{b}"), "x^{a b}");
    }

    #[test]
    fn merges_braced_subscripts_with_spacing() {
        assert_eq!(fix_consecutive_scripts("x_{ i }_{ j }"), "x_{i  j }");
    }

    #[test]
    fn chains_collapse_pairwise() {
        // An odd tail stays separate: only like forms merge.
        assert_eq!(fix_consecutive_scripts("x_1_2_3"), "x_{12}_3");
        // Two pairs become braced groups, which then merge with each other.
        assert_eq!(fix_consecutive_scripts("x_1_2_3_4"), "x_{12 34}");
    }

    #[test]
    fn leaves_single_scripts_alone() {
        assert_eq!(fix_consecutive_scripts("x_{n}^{2}"), "x_{n}^{2}");
        assert_eq!(fix_consecutive_scripts("\\sum_i a_i"), "\\sum_i a_i");
    }

    #[test]
    fn does_not_touch_commands() {
        // Backslash atoms are excluded from the simple-atom rule.
        assert_eq!(
            fix_consecutive_scripts("x_\\alpha _\\beta "),
            "x_\\alpha _\\beta "
        );
    }

    #[test]
    fn mixed_sub_and_sup_stay_separate() {
        assert_eq!(fix_consecutive_scripts("x_1^2"), "x_1^2");
    }

    #[test]
    fn idempotent_on_samples() {
        for s in [
            "x_1_2",
            "x^a^b^c",
            "x^{a}^{b}",
            "x_{ i }_{ j }^{p}^{q}",
            "\\frac { a } { b }",
            "x_1_2_3_4",
        ] {
            let once = fix_consecutive_scripts(s);
            assert_eq!(fix_consecutive_scripts(&once), once, "input {s:?}");
        }
    }
}
