//! Keyword and alias tables.
//!
//! Words are classified in a fixed order: canonical keyword, short alias,
//! long alias, control word, binary literal, boolean, null, undefined and
//! finally plain identifier. Keyword matching is case-sensitive; the literal
//! words (`true`, `nil`, `undefined` ...) are not.

use crate::token::TokenKind;

pub const KEYWORDS: &[&str] = &[
    "TYPE", "GLOBAL", "LOCAL", "STRICT", "ALL", "JSON", "HTTPJSON", "HTTPTEXT", "HTTPJUSTC",
    "JUSTC", "IMPORT", "EXPORT", "COPY", "REQUIRE", "ENV", "CONFIG", "RUN", "VALUE", "FILE",
    "STAT", "STRING", "LINK", "STRINGNUM", "STRINGB64", "STRINGBIN", "STRINGHEX", "TYPEID",
    "TYPEOF", "OUTPUT", "RETURN", "V", "D", "SQ", "CU", "P", "M", "S", "C", "T", "N", "ECHO",
    "LOGFILE", "LOG", "PARSEJUSTC", "PARSEJSON", "SPECIFIED", "EVERYTHING", "DISABLED", "AS",
    "STRINGOCT", "NUMBER", "BINARY", "OCTAL", "BASE64", "HEXADECIMAL", "PARSEHOCON",
    "HTTPHOCON", "BASE32", "STRINGB32", "ABSOLUTE", "CEIL", "FLOOR", "ALLOW", "DISALLOW",
    "JAVASCRIPT",
];

/// One to four (occasionally six) letter abbreviations of canonical keywords.
pub const SHORT_ALIASES: &[(&str, &str)] = &[
    ("T", "TYPE"),
    ("G", "GLOBAL"),
    ("L", "LOCAL"),
    ("SC", "STRICT"),
    ("A", "ALL"),
    ("JS", "JSON"),
    ("JC", "JUSTC"),
    ("I", "IMPORT"),
    ("EX", "EXPORT"),
    ("CP", "COPY"),
    ("RQ", "REQUIRE"),
    ("E", "ENV"),
    ("HJS", "HTTPJSON"),
    ("HT", "HTTPTEXT"),
    ("HJ", "HTTPJUSTC"),
    ("HH", "HTTPHOCON"),
    ("CO", "CONFIG"),
    ("R", "RUN"),
    ("O", "VALUE"),
    ("F", "FILE"),
    ("FS", "STAT"),
    ("ST", "STRING"),
    ("SL", "LINK"),
    ("SN", "STRINGNUM"),
    ("S64", "STRINGB64"),
    ("S02", "STRINGBIN"),
    ("S16", "STRINGHEX"),
    ("ID", "TYPEID"),
    ("OF", "TYPEOF"),
    ("OUT", "OUTPUT"),
    ("RT", "RETURN"),
    ("Q", "SQ"),
    ("U", "CU"),
    ("PJ", "PARSEJUSTC"),
    ("PJS", "PARSEJSON"),
    ("SP", "SPECIFIED"),
    ("EV", "EVERYTHING"),
    ("N", "DISABLED"),
    ("NUM", "NUMBER"),
    ("SO", "STRINGOCT"),
    ("B", "BINARY"),
    ("OC", "OCTAL"),
    ("B64", "BASE64"),
    ("HEX", "HEXADECIMAL"),
    ("PH", "PARSEHOCON"),
    ("S32", "STRINGB32"),
    ("B32", "BASE32"),
    ("AB", "ABSOLUTE"),
    ("CE", "CEIL"),
    ("FL", "FLOOR"),
    ("AL", "ALLOW"),
    ("DL", "DISALLOW"),
    ("J", "JAVASCRIPT"),
    ("HJC", "HTTPJUSTC"),
    ("CF", "CONFIG"),
    ("SZ", "STAT"),
    ("S10", "STRINGNUM"),
    ("SNUM", "STRINGNUM"),
    ("TID", "TYPEID"),
    ("TO", "TYPEOF"),
    ("PUT", "RETURN"),
    ("PJC", "PARSEJUSTC"),
    ("SPEC", "SPECIFIED"),
    ("EVERY", "EVERYTHING"),
    ("DIS", "DISABLED"),
    ("SOCT", "STRINGOCT"),
    ("S08", "STRINGOCT"),
    ("BIN", "BINARY"),
    ("OCT", "OCTAL"),
    ("HEXDEC", "HEXADECIMAL"),
    ("B02", "BINARY"),
    ("B08", "OCTAL"),
    ("B10", "NUMBER"),
    ("B16", "HEXADECIMAL"),
    ("ABS", "ABSOLUTE"),
];

/// Spelled-out names of the single-letter math keywords.
pub const LONG_ALIASES: &[(&str, &str)] = &[
    ("SQRT", "V"),
    ("ROOT", "V"),
    ("DOUBLE", "D"),
    ("SQUARE", "SQ"),
    ("CUBE", "CU"),
    ("NEGATIVE", "N"),
    ("SIN", "S"),
    ("SINE", "S"),
    ("COS", "C"),
    ("COSINE", "C"),
    ("TAN", "T"),
    ("TANGENT", "T"),
];

pub const CONTROL_WORDS: &[&str] = &[
    "is", "isn't", "isif", "isifn't", "then", "then't", "elseif", "elseifn't", "else", "elsen't",
    "and", "andn't", "or", "orn't",
];

fn lookup<'t>(table: &'t [(&'t str, &'t str)], word: &str) -> Option<&'t str> {
    table
        .iter()
        .find(|(alias, _)| *alias == word)
        .map(|(_, canonical)| *canonical)
}

/// Canonical spelling of a keyword, following aliases. `None` when the word
/// is not a keyword at all.
pub fn canonical(word: &str) -> Option<&'static str> {
    if let Some(keyword) = KEYWORDS.iter().find(|k| **k == word) {
        return Some(*keyword);
    }
    lookup(SHORT_ALIASES, word).or_else(|| lookup(LONG_ALIASES, word))
}

pub fn is_control_word(word: &str) -> bool {
    CONTROL_WORDS.contains(&word)
}

fn is_binary_literal(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some('b' | 'B'))
        && word.len() > 1
        && chars.all(|c| c == '0' || c == '1')
}

/// Classify a scanned word into its token kind and token text.
pub fn classify(word: &str) -> (TokenKind, String) {
    if let Some(keyword) = canonical(word) {
        return (TokenKind::Keyword, keyword.to_string());
    }
    if is_control_word(word) {
        return (TokenKind::Keyword, word.to_string());
    }
    if is_binary_literal(word) {
        return (TokenKind::Binary, word.to_string());
    }

    let kind = match word.to_ascii_lowercase().as_str() {
        "true" | "yes" | "false" | "no" => TokenKind::Boolean,
        "null" | "nil" => TokenKind::Null,
        "undefined" => TokenKind::Undefined,
        _ => TokenKind::Identifier,
    };
    (kind, word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keyword_wins_over_alias() {
        // `T` is both the tangent keyword and the short alias of TYPE
        assert_eq!(canonical("T"), Some("T"));
        assert_eq!(canonical("N"), Some("N"));
        assert_eq!(canonical("TYPE"), Some("TYPE"));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(canonical("SP"), Some("SPECIFIED"));
        assert_eq!(canonical("B10"), Some("NUMBER"));
        assert_eq!(canonical("SQRT"), Some("V"));
        assert_eq!(canonical("COSINE"), Some("C"));
        assert_eq!(canonical("sqrt"), None);
    }

    #[test]
    fn test_classify_literals() {
        assert_eq!(classify("Yes").0, TokenKind::Boolean);
        assert_eq!(classify("NIL").0, TokenKind::Null);
        assert_eq!(classify("undefined").0, TokenKind::Undefined);
        assert_eq!(classify("b101"), (TokenKind::Binary, "b101".to_string()));
        assert_eq!(classify("b102").0, TokenKind::Identifier);
        assert_eq!(classify("isn't"), (TokenKind::Keyword, "isn't".to_string()));
        assert_eq!(classify("width").0, TokenKind::Identifier);
    }
}
