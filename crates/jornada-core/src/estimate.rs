//! Dream naming and reference-value estimation
//!
//! Both lookups are plain ordered tables so the labels and ranges can be
//! tuned without touching the matching logic. Table order is the precedence
//! rule: specific entries ("dublin") sit above the generic ones that would
//! also match ("intercambio", "viagem").

use crate::text::normalize;

/// Label used when no usable dream text remains.
pub const GENERIC_GOAL_LABEL: &str = "Meta Financeira";

/// Canonical labels for well-known dreams, first match wins.
const DREAM_LABELS: &[(&str, &str)] = &[
    ("japao", "Viagem no Japao"),
    ("dublin", "Intercambio em Dublin"),
    ("intercambio", "Intercambio Internacional"),
    ("casamento", "Casamento"),
    ("apartamento", "Entrada de Apartamento"),
    ("imovel", "Entrada de Imovel"),
    ("casa", "Entrada de Casa"),
    ("carro", "Compra de Carro"),
    ("viagem", "Viagem Internacional"),
];

/// Leading filler phrases stripped before title-casing free-form dreams.
const FILLER_PHRASES: &[&str] = &[
    "eu gostaria de",
    "eu quero",
    "gostaria de",
    "meu sonho eh",
    "meu sonho e",
    "sonho de",
    "quero",
];

/// Leading verbs stripped after the filler phrases.
const FILLER_VERBS: &[&str] = &["passar", "fazer", "ter", "comprar", "juntar"];

/// Words kept lowercase when not in first position.
const STOP_WORDS: &[&str] = &[
    "de", "do", "da", "dos", "das", "e", "em", "no", "na", "para", "por",
];

/// Reference-value range and note for a group of dream keywords.
struct EstimateGroup {
    keywords: &'static [&'static str],
    range: (f64, f64),
    note: &'static str,
}

/// Ordered estimation table, first matching group wins.
const ESTIMATE_GROUPS: &[EstimateGroup] = &[
    EstimateGroup {
        keywords: &["intercambio", "dublin"],
        range: (30_000.0, 45_000.0),
        note: "estimativa para 6 meses com estudo e custo de vida",
    },
    EstimateGroup {
        keywords: &["japao", "viagem", "europa", "canada"],
        range: (18_000.0, 35_000.0),
        note: "estimativa para 2 a 3 semanas, sem luxo",
    },
    EstimateGroup {
        keywords: &["casamento"],
        range: (35_000.0, 90_000.0),
        note: "estimativa para evento de porte medio",
    },
    EstimateGroup {
        keywords: &["carro"],
        range: (55_000.0, 130_000.0),
        note: "estimativa para compra de carro de entrada a intermediario",
    },
    EstimateGroup {
        keywords: &["apartamento", "imovel", "casa", "entrada"],
        range: (50_000.0, 180_000.0),
        note: "estimativa para entrada de imovel em grandes centros",
    },
];

const GENERIC_RANGE: (f64, f64) = (15_000.0, 50_000.0);
const GENERIC_NOTE: &str = "faixa generica para metas de medio porte";

/// Map free-form dream text to a display label.
///
/// Known keywords map to their canonical label. Otherwise the text is
/// stripped of leading filler ("eu quero", "gostaria de", then a leading
/// verb), cut to the first 7 words and title-cased, keeping Portuguese
/// stop-words lowercase in non-initial position.
pub fn prettify_dream_name(text: &str) -> String {
    let normalized = normalize(text);
    let normalized = normalized.trim_matches(&[' ', '?', '!', '.'][..]);
    if normalized.is_empty() {
        return GENERIC_GOAL_LABEL.to_string();
    }

    for (keyword, label) in DREAM_LABELS {
        if normalized.contains(keyword) {
            return (*label).to_string();
        }
    }

    let rest = strip_leading(normalized, FILLER_PHRASES);
    let rest = strip_leading(rest, FILLER_VERBS);
    if rest.is_empty() {
        return GENERIC_GOAL_LABEL.to_string();
    }

    rest.split(' ')
        .take(7)
        .enumerate()
        .map(|(index, word)| {
            if index > 0 && STOP_WORDS.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip the first matching prefix, but only at a word boundary.
fn strip_leading<'a>(text: &'a str, prefixes: &[&str]) -> &'a str {
    for prefix in prefixes {
        if let Some(stripped) = text.strip_prefix(prefix) {
            if stripped.is_empty() || stripped.starts_with(' ') {
                return stripped.trim_start();
            }
        }
    }
    text
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reference value range and explanatory note for a dream.
pub fn estimate_goal_by_keywords(text: &str) -> ((f64, f64), &'static str) {
    let normalized = normalize(text);
    for group in ESTIMATE_GROUPS {
        if group.keywords.iter().any(|k| normalized.contains(k)) {
            return (group.range, group.note);
        }
    }
    (GENERIC_RANGE, GENERIC_NOTE)
}
