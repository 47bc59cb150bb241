//! Text normalization shared by candidate compilation and content matching.
//!
//! Both sides of every comparison must pass through [`normalize`]; a second,
//! diverging normalizer would make write-time and batch matching disagree,
//! so this module is the single source of truth for the contract.

/// Normalize raw content or keyword text for comparison.
///
/// Applied to a lower-cased copy of the input, in order:
/// 1. U+00A0 (non-breaking space) becomes a plain space.
/// 2. The invisible/format space block (U+2000–U+200F, U+2028, U+2029,
///    U+202F, U+205F, U+3000) becomes a plain space.
/// 3. U+00AD (soft hyphen) is removed outright.
/// 4. Cyrillic "ё" becomes "е".
/// 5. Whitespace runs collapse to a single space.
/// 6. Leading/trailing whitespace is trimmed.
///
/// `None` or empty input yields `""`.
#[must_use]
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for raw in text.chars() {
        for ch in raw.to_lowercase() {
            let ch = match ch {
                // Soft hyphen disappears without leaving a gap.
                '\u{00ad}' => continue,
                '\u{00a0}' | '\u{2000}'..='\u{200f}' | '\u{2028}' | '\u{2029}' | '\u{202f}'
                | '\u{205f}' | '\u{3000}' => ' ',
                'ё' => 'е',
                other => other,
            };

            if ch.is_whitespace() {
                // Collapse runs; never emit a leading space.
                pending_space = !out.is_empty();
            } else {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(ch);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_yields_empty() {
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn test_empty_yields_empty() {
        assert_eq!(normalize(Some("")), "");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize(Some("ПРИВЕТ Мир")), "привет мир");
    }

    #[test]
    fn test_nbsp_becomes_space() {
        assert_eq!(normalize(Some("Ёлка\u{00a0}стоит")), "елка стоит");
    }

    #[test]
    fn test_format_spaces_become_space() {
        assert_eq!(normalize(Some("а\u{2003}б")), "а б");
        assert_eq!(normalize(Some("а\u{200b}б")), "а б");
        assert_eq!(normalize(Some("а\u{2028}б")), "а б");
        assert_eq!(normalize(Some("а\u{202f}б")), "а б");
        assert_eq!(normalize(Some("а\u{3000}б")), "а б");
    }

    #[test]
    fn test_soft_hyphen_removed_not_spaced() {
        // The halves join, no gap remains.
        assert_eq!(normalize(Some("ко\u{00ad}шка")), "кошка");
    }

    #[test]
    fn test_yo_folded() {
        assert_eq!(normalize(Some("ёжик Ёлка")), "ежик елка");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(normalize(Some("  кот \t\n  пес  ")), "кот пес");
    }

    #[test]
    fn test_only_whitespace_yields_empty() {
        assert_eq!(normalize(Some(" \u{00a0}\u{2002} \t ")), "");
    }

    #[test]
    fn test_only_soft_hyphens_yields_empty() {
        assert_eq!(normalize(Some("\u{00ad}\u{00ad}")), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(Some("Ёжик\u{00a0} в  ТУМАНЕ\u{00ad}"));
        let twice = normalize(Some(&once));
        assert_eq!(once, twice);
    }
}
