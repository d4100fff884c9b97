//! Free-form currency and term parsing
//!
//! Users type Brazilian-locale amounts ambiguously ("R$ 35.000" vs "35,50").
//! The separator heuristics here resolve the common cases without pulling in
//! a full locale library.

use regex::Regex;

use crate::text::normalize;

/// Parse a monetary amount out of free-form text.
///
/// Strips a leading `r$` marker and spaces, then disambiguates separators:
/// - both `,` and `.` present: `.` is thousands grouping, `,` is the decimal;
/// - only `,`: decimal separator;
/// - only `.`: multiple dots are grouping; a single dot followed by exactly
///   three digits with digits on both sides is grouping ("35.000" -> 35000),
///   anything else is a decimal point.
///
/// Returns `None` when no number is found or the value is negative.
pub fn parse_currency(text: &str) -> Option<f64> {
    let mut raw = normalize(text).replace("r$", "").replace(' ', "");
    if raw.is_empty() {
        return None;
    }

    if raw.contains(',') && raw.contains('.') {
        raw = raw.replace('.', "").replace(',', ".");
    } else if raw.contains(',') {
        raw = raw.replace(',', ".");
    } else {
        let dots = raw.matches('.').count();
        if dots > 1 {
            raw = raw.replace('.', "");
        } else if dots == 1 {
            let (left, right) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
            // BR grouping heuristic: "35.000" -> 35000
            if right.len() == 3
                && !left.is_empty()
                && left.chars().all(|c| c.is_ascii_digit())
                && right.chars().all(|c| c.is_ascii_digit())
            {
                raw = format!("{left}{right}");
            }
        }
    }

    let re = Regex::new(r"-?\d+(?:\.\d+)?").ok()?;
    let value: f64 = re.find(&raw)?.as_str().parse().ok()?;
    if value < 0.0 {
        return None;
    }
    Some(value)
}

/// Parse a term in months out of free-form text.
///
/// `"<n> ano(s)"` wins over `"<n> mes(es)"` even when both would match; a
/// bare integer is taken as a month count.
pub fn parse_months(text: &str) -> Option<u32> {
    let base = normalize(text);
    if base.is_empty() {
        return None;
    }

    let years = Regex::new(r"(\d+)\s*anos?").ok()?;
    if let Some(caps) = years.captures(&base) {
        let n: u32 = caps.get(1)?.as_str().parse().ok()?;
        // absurd year counts overflow the month conversion; treat as unparseable
        return n.checked_mul(12);
    }

    let months = Regex::new(r"(\d+)\s*mes(?:es)?").ok()?;
    if let Some(caps) = months.captures(&base) {
        return caps.get(1)?.as_str().parse().ok();
    }

    let numeric = Regex::new(r"\d+").ok()?;
    numeric.find(&base)?.as_str().parse().ok()
}

/// Format a value as Brazilian currency: `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_br_thousands() {
        assert_eq!(parse_currency("R$ 35.000"), Some(35000.0));
        assert_eq!(parse_currency("35.000"), Some(35000.0));
        assert_eq!(parse_currency("1.234.567"), Some(1234567.0));
    }

    #[test]
    fn test_parse_currency_comma_decimal() {
        assert_eq!(parse_currency("35,50"), Some(35.5));
        assert_eq!(parse_currency("R$ 1.234,56"), Some(1234.56));
    }

    #[test]
    fn test_parse_currency_plain_decimal() {
        // one dot but not the 3-digit grouping shape stays a decimal point
        assert_eq!(parse_currency("35.5"), Some(35.5));
        assert_eq!(parse_currency("0.25"), Some(0.25));
    }

    #[test]
    fn test_parse_currency_no_number() {
        assert_eq!(parse_currency("texto solto"), None);
        assert_eq!(parse_currency(""), None);
    }

    #[test]
    fn test_parse_currency_negative_rejected() {
        assert_eq!(parse_currency("-500"), None);
    }

    #[test]
    fn test_parse_currency_zero_allowed() {
        assert_eq!(parse_currency("0"), Some(0.0));
    }

    #[test]
    fn test_parse_months_years() {
        assert_eq!(parse_months("2 anos"), Some(24));
        assert_eq!(parse_months("1 ano"), Some(12));
    }

    #[test]
    fn test_parse_months_months() {
        assert_eq!(parse_months("18 meses"), Some(18));
        assert_eq!(parse_months("1 mes"), Some(1));
    }

    #[test]
    fn test_parse_months_year_wins_over_month() {
        // both patterns present: years take priority
        assert_eq!(parse_months("2 anos ou 30 meses"), Some(24));
    }

    #[test]
    fn test_parse_months_bare_integer() {
        assert_eq!(parse_months("24"), Some(24));
        assert_eq!(parse_months("em uns 36 talvez"), Some(36));
    }

    #[test]
    fn test_parse_months_no_match() {
        assert_eq!(parse_months("depois"), None);
    }

    #[test]
    fn test_parse_months_huge_years_rejected() {
        // year counts whose month conversion exceeds u32 are unparseable,
        // not silently wrapped into a small month count
        assert_eq!(parse_months("400000000 anos"), None);
        assert_eq!(parse_months("357913942 anos"), None);
        // largest representable conversion still works
        assert_eq!(parse_months("357913941 anos"), Some(4_294_967_292));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(35000.0), "R$ 35.000,00");
        assert_eq!(format_currency(1234.56), "R$ 1.234,56");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(999.9), "R$ 999,90");
    }
}
