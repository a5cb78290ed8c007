//! Plural to singular inflection for service targets.

use once_cell::sync::Lazy;
use regex::Regex;

/// Turns an English plural into its singular form.
///
/// Words without a known singular are returned unchanged.
pub trait Singularize {
    fn singularize(&self, word: &str) -> String;
}

const UNCOUNTABLE: &[&str] = &[
    "analytics",
    "data",
    "equipment",
    "information",
    "kubernetes",
    "money",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("children", "child"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
];

// First match wins
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(database|cache|drive|move)s$", "$1"),
        (r"(?i)(quiz)zes$", "$1"),
        (r"(?i)^(ox)en$", "$1"),
        (r"(?i)(alias|status|bus)(es)?$", "$1"),
        (r"(?i)(octop|vir)(us|i)$", "${1}us"),
        (r"(?i)(cris|ax|test)(is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "$1"),
        (r"(?i)(o)es$", "$1"),
        (r"(?i)([ml])ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "$1"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive|hive)s$", "$1"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(analy|diagno|parenthe|progno|synop|the)ses$", "${1}sis"),
        (r"(?i)(ss|us|is)$", "$1"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("valid inflection rule"),
            replacement,
        )
    })
    .collect()
});

/// Rule-based English singularizer
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSingularizer;

impl Singularize for EnglishSingularizer {
    fn singularize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }

        if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
            return match_first_letter_case(word, singular);
        }

        for (rule, replacement) in RULES.iter() {
            if rule.is_match(word) {
                return rule.replace(word, *replacement).into_owned();
            }
        }

        word.to_string()
    }
}

/// Leaves words untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInflection;

impl Singularize for NoInflection {
    fn singularize(&self, word: &str) -> String {
        word.to_string()
    }
}

fn match_first_letter_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        _ => replacement.to_string(),
    }
}

/// Singularize the trailing word of a PascalCase identifier
/// (`VirtualMachines` -> `VirtualMachine`). Identifiers ending in an
/// upper-case acronym (`PrivateDNS`) are left alone.
pub fn singularize_identifier(identifier: &str, inflector: &dyn Singularize) -> String {
    if !identifier.chars().last().is_some_and(char::is_lowercase) {
        return identifier.to_string();
    }

    let split = identifier
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_uppercase())
        .map_or(0, |(i, _)| i);

    let (head, tail) = identifier.split_at(split);
    format!("{}{}", head, inflector.singularize(tail))
}
