//! Text normalization
//!
//! Every classifier and parser in this crate matches against the output of
//! [`normalize`], never against raw user text, so accents and casing can
//! never change how a message is classified.

use unicode_normalization::UnicodeNormalization;

/// Normalize user text for keyword matching.
///
/// NFKD-decomposes the input, drops every non-ASCII code point (which strips
/// diacritics: "japão" becomes "japao"), collapses whitespace runs to a
/// single space, trims, and lowercases. Empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let ascii: String = text.nfkd().filter(|c| c.is_ascii()).collect();
    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("Japão"), "japao");
        assert_eq!(normalize("previsão do tempo"), "previsao do tempo");
        assert_eq!(normalize("Intercâmbio"), "intercambio");
    }

    #[test]
    fn test_collapses_whitespace_and_lowercases() {
        assert_eq!(normalize("  Eu   QUERO\tviajar \n"), "eu quero viajar");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
