//! SQL identifier normalization.
//!
//! Candidate table and column names pass through two stages: a text
//! pre-pass ([`slugify`]) that folds diacritics and collapses whitespace,
//! then the identifier rules proper ([`normalize_identifier`]): leading
//! character check, character-class scrubbing, reserved-word rejection,
//! and truncation to the 30-character legacy identifier budget.

use crate::error::{Error, Result};
use crate::relation::MAX_IDENTIFIER_LEN;
use regex::Regex;
use std::sync::OnceLock;

/// Reserved words rejected (or prefixed) after scrubbing.
const RESERVED_WORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "CREATE", "ALTER", "DROP",
    "TABLE", "COLUMN", "INDEX", "VIEW",
];

/// Prefix applied to reserved words in replace mode.
const RESERVED_PREFIX: &str = "c_";

fn ident_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("valid identifier pattern"))
}

/// Fold a character's diacritic to its base ASCII letter(s).
///
/// Covers the Latin-1 and Latin Extended-A ranges that show up in
/// real-world column labels; anything else passes through unchanged.
fn fold_diacritic(c: char, out: &mut String) {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ā' | 'Ă' | 'Ą' => out.push('A'),
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => out.push('e'),
        'É' | 'È' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => out.push('E'),
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'ĭ' | 'į' => out.push('i'),
        'Í' | 'Ì' | 'Î' | 'Ï' | 'Ī' | 'Ĭ' | 'Į' => out.push('I'),
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' | 'ŏ' | 'ő' => out.push('o'),
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ō' | 'Ŏ' | 'Ő' => out.push('O'),
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ŭ' | 'ů' | 'ű' => out.push('u'),
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' => out.push('U'),
        'ý' | 'ÿ' => out.push('y'),
        'Ý' => out.push('Y'),
        'ñ' | 'ń' | 'ň' => out.push('n'),
        'Ñ' | 'Ń' | 'Ň' => out.push('N'),
        'ç' | 'ć' | 'č' => out.push('c'),
        'Ç' | 'Ć' | 'Č' => out.push('C'),
        'š' | 'ś' => out.push('s'),
        'Š' | 'Ś' => out.push('S'),
        'ž' | 'ź' | 'ż' => out.push('z'),
        'Ž' | 'Ź' | 'Ż' => out.push('Z'),
        'ď' => out.push('d'),
        'Ď' | 'Đ' => out.push('D'),
        'ť' => out.push('t'),
        'Ť' => out.push('T'),
        'ř' => out.push('r'),
        'Ř' => out.push('R'),
        'ł' => out.push('l'),
        'Ł' => out.push('L'),
        'ß' => out.push_str("ss"),
        'æ' => out.push_str("ae"),
        'Æ' => out.push_str("AE"),
        'ø' => out.push('o'),
        'Ø' => out.push('O'),
        other => out.push(other),
    }
}

/// Text pre-pass: fold diacritics, trim, and collapse whitespace runs
/// into a single replacement character.
///
/// # Examples
///
/// ```
/// use rowmap_core::slugify;
///
/// assert_eq!(slugify("Crédit  Total", false, '_'), "Credit_Total");
/// assert_eq!(slugify("Crédit Total", true, '-'), "credit-total");
/// ```
#[must_use]
pub fn slugify(text: &str, to_lower: bool, space_char: char) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.trim().chars() {
        fold_diacritic(c, &mut folded);
    }

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(space_char);
            pending_space = false;
        }
        if to_lower {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Validate and sanitize a candidate table or column name.
///
/// Rules, in order:
/// 1. diacritic/whitespace pre-pass ([`slugify`] with `_` as the space
///    replacement);
/// 2. error if the trimmed name is empty;
/// 3. error unless the first character is a letter or underscore;
/// 4. letters, digits, `_` and `$` pass through; any other character is
///    replaced by `_` when `replace_invalid` is set, otherwise the
///    offending character is named in the error;
/// 5. the scrubbed result is checked case-insensitively against the
///    reserved words; strict mode rejects, replace mode prefixes `c_`
///    (the scrub-then-check ordering is load-bearing for callers that
///    rely on otherwise-valid names still being rejected);
/// 6. the result is truncated to 30 characters.
///
/// The function is idempotent over its own output.
pub fn normalize_identifier(raw_name: &str, replace_invalid: bool) -> Result<String> {
    let prepared = slugify(raw_name, false, '_');
    if prepared.is_empty() {
        return Err(Error::argument_named(
            "raw_name",
            "identifier is empty after trimming",
        ));
    }

    let first = prepared.chars().next().unwrap_or('_');
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(Error::argument_named(
            "raw_name",
            format!("identifier must start with a letter or underscore, got `{first}`"),
        ));
    }

    let scrubbed = if ident_regex().is_match(&prepared) {
        prepared
    } else {
        let mut out = String::with_capacity(prepared.len());
        for c in prepared.chars() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                out.push(c);
            } else if replace_invalid {
                out.push('_');
            } else {
                return Err(Error::argument_named(
                    "raw_name",
                    format!("invalid character `{c}` in identifier"),
                ));
            }
        }
        out
    };

    let upper = scrubbed.to_uppercase();
    let result = if RESERVED_WORDS.contains(&upper.as_str()) {
        if replace_invalid {
            format!("{RESERVED_PREFIX}{scrubbed}")
        } else {
            return Err(Error::argument_named(
                "raw_name",
                format!("`{scrubbed}` is a reserved SQL keyword"),
            ));
        }
    } else {
        scrubbed
    };

    Ok(result.chars().take(MAX_IDENTIFIER_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_folds_diacritics() {
        assert_eq!(slugify("naïve café", false, '_'), "naive_cafe");
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("  a   b \t c ", false, '_'), "a_b_c");
    }

    #[test]
    fn test_slugify_lowercase_mode() {
        assert_eq!(slugify("Groß Umsatz", true, '-'), "gross-umsatz");
    }

    #[test]
    fn test_normalize_simple_passthrough() {
        assert_eq!(normalize_identifier("users", true).unwrap(), "users");
        assert_eq!(normalize_identifier("_tmp$1", false).unwrap(), "_tmp$1");
    }

    #[test]
    fn test_normalize_replaces_invalid_chars() {
        assert_eq!(
            normalize_identifier("Invalid Name@2023", true).unwrap(),
            "Invalid_Name_2023"
        );
    }

    #[test]
    fn test_normalize_strict_names_offending_char() {
        let err = normalize_identifier("price%", false).unwrap_err();
        assert!(err.to_string().contains('%'));
    }

    #[test]
    fn test_normalize_empty_rejected() {
        assert!(normalize_identifier("   ", true).is_err());
        assert!(normalize_identifier("", false).is_err());
    }

    #[test]
    fn test_normalize_bad_first_char() {
        assert!(normalize_identifier("1table", true).is_err());
        assert!(normalize_identifier("$cash", true).is_err());
    }

    #[test]
    fn test_normalize_reserved_strict_mode() {
        let err = normalize_identifier("SELECT", false).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_normalize_reserved_replace_mode_prefixes() {
        assert_eq!(normalize_identifier("SELECT", true).unwrap(), "c_SELECT");
        assert_eq!(normalize_identifier("table", true).unwrap(), "c_table");
    }

    #[test]
    fn test_normalize_truncates_to_30() {
        let long = "ThisIsAVeryLongNameThatExceedsTheLimitOfThirtyCharacters";
        let result = normalize_identifier(long, true).unwrap();
        assert_eq!(result, &long[..30]);
        assert_eq!(result.len(), 30);
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in [
            "users",
            "Invalid Name@2023",
            "SELECT",
            "ThisIsAVeryLongNameThatExceedsTheLimitOfThirtyCharacters",
            "crédit_total",
        ] {
            let once = normalize_identifier(input, true).unwrap();
            let twice = normalize_identifier(&once, true).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_normalize_diacritics_then_truncate() {
        let input = "Äccented Cölumn Name That Is Really Long";
        let result = normalize_identifier(input, true).unwrap();
        assert!(result.starts_with("Accented_Column_Name"));
        assert!(result.len() <= 30);
    }
}
