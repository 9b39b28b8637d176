//! Per-line feature extraction shared by every other component.

use crate::patterns;
use crate::types::SeparatorKind;

/// Derived features of a single input line. Computed on demand, never
/// persisted.
#[derive(Debug, Clone, Copy)]
pub struct LineFormat {
    pub has_separator: bool,
    pub separator: SeparatorKind,
    pub column_count: usize,
    pub is_header: bool,
    pub is_numeric: bool,
}

pub fn analyze_line(line: &str) -> LineFormat {
    let separator = detect_separator(line);
    LineFormat {
        has_separator: separator != SeparatorKind::None,
        separator,
        column_count: count_columns(line, separator),
        is_header: is_header_like(line),
        is_numeric: is_numeric_like(line),
    }
}

/// First separator family present with enough occurrences to suggest
/// columns. Commas need two hits so prose clauses don't register.
pub(crate) fn detect_separator(line: &str) -> SeparatorKind {
    if line.matches('\t').count() >= 1 {
        SeparatorKind::Tab
    } else if line.matches('|').count() >= 1 {
        SeparatorKind::Pipe
    } else if line.matches(',').count() >= 2 {
        SeparatorKind::Comma
    } else if multi_space_runs(line) >= 1 {
        SeparatorKind::MultiSpace
    } else {
        SeparatorKind::None
    }
}

/// Number of runs of two or more consecutive spaces.
pub(crate) fn multi_space_runs(line: &str) -> usize {
    patterns::multi_space().find_iter(line).count()
}

/// Non-empty cell count when splitting on the given separator.
pub(crate) fn count_columns(line: &str, separator: SeparatorKind) -> usize {
    let cells: Vec<&str> = match separator {
        SeparatorKind::Tab => line.split('\t').collect(),
        SeparatorKind::Pipe => line.split('|').collect(),
        SeparatorKind::Comma => line.split(',').collect(),
        SeparatorKind::MultiSpace => patterns::multi_space().split(line.trim()).collect(),
        SeparatorKind::None => {
            return if line.trim().is_empty() { 0 } else { 1 };
        }
    };
    cells.iter().filter(|c| !c.trim().is_empty()).count()
}

/// Short, mostly-capitalized, digit-free lines read as headers. Markdown
/// headings always qualify; `key: value` lines never do.
pub(crate) fn is_header_like(line: &str) -> bool {
    let t = line.trim();
    if t.is_empty() {
        return false;
    }
    if patterns::markdown_heading().is_match(t) {
        return true;
    }
    if t.len() > 60 || t.ends_with('.') || t.ends_with(',') || t.ends_with(';') {
        return false;
    }
    if t.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if is_list_item(t) {
        return false;
    }
    if patterns::key_prefix().is_match(t) && !t.ends_with(':') {
        return false;
    }
    let alpha_words: Vec<&str> = t
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    if alpha_words.is_empty() || alpha_words.len() > 8 {
        return false;
    }
    let capitalized = alpha_words
        .iter()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
        .count();
    capitalized as f64 / alpha_words.len() as f64 >= 0.6
}

/// True when at least half the tokens carry digits.
pub(crate) fn is_numeric_like(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return false;
    }
    let numeric = tokens
        .iter()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .count();
    numeric as f64 / tokens.len() as f64 >= 0.5
}

/// True for numbered, lettered, bulleted and checkbox list items.
pub(crate) fn is_list_item(line: &str) -> bool {
    patterns::checkbox_item().is_match(line)
        || patterns::numbered_item().is_match(line)
        || patterns::lettered_item().is_match(line)
        || patterns::bullet_item().is_match(line)
}

/// Parse a token as a number, tolerating currency symbols, thousands
/// separators and European decimal commas.
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    let stripped: String = token
        .trim()
        .trim_start_matches(['$', '€', '£', '¥'])
        .trim_start()
        .trim_end_matches('%')
        .to_string();
    if stripped.is_empty() || !stripped.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '-') {
        return None;
    }
    let normalized = if stripped.contains(',') && stripped.contains('.') {
        stripped.replace(',', "")
    } else if stripped.contains(',') {
        stripped.replace(',', ".")
    } else {
        stripped
    };
    normalized.parse::<f64>().ok()
}

/// All tokens in `text` that parse as numbers.
pub(crate) fn numeric_tokens(text: &str) -> Vec<f64> {
    text.split_whitespace().filter_map(parse_number).collect()
}
