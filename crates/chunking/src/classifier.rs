//! Per-block type classification and metadata extraction.

use crate::line_format::{self, LineFormat};
use crate::patterns;
use crate::types::{BlockMetadata, BlockType, SemanticBlock};

/// A table needs at least this share of lines near the average column
/// count.
pub const TABLE_CONSISTENCY_MIN: f64 = 0.7;
/// Lists and structured blocks need a majority of matching lines.
pub const MAJORITY_MIN: f64 = 0.5;
/// Header blocks are at most this many lines.
pub const HEADER_BLOCK_MAX_LINES: usize = 3;

/// Facts the classification rules are evaluated against.
struct ClassifyFacts {
    line_count: usize,
    avg_columns: f64,
    near_avg_ratio: f64,
    list_ratio: f64,
    key_prefix_ratio: f64,
    all_header: bool,
}

/// Ordered first-match-wins cascade; `Paragraph` is the fallthrough.
const CLASSIFY_RULES: &[(BlockType, fn(&ClassifyFacts) -> bool)] = &[
    (BlockType::Table, |f| {
        f.avg_columns > 1.0 && f.near_avg_ratio >= TABLE_CONSISTENCY_MIN
    }),
    (BlockType::List, |f| f.list_ratio > MAJORITY_MIN),
    (BlockType::Header, |f| {
        f.line_count <= HEADER_BLOCK_MAX_LINES && f.all_header
    }),
    (BlockType::Structured, |f| f.key_prefix_ratio > MAJORITY_MIN),
];

/// Classify a block's lines. Total: empty input is `Unknown`.
pub(crate) fn classify_lines(lines: &[String]) -> BlockType {
    let content: Vec<&str> = lines
        .iter()
        .map(|l| l.as_str())
        .filter(|l| !l.trim().is_empty())
        .collect();
    if content.is_empty() {
        return BlockType::Unknown;
    }
    let formats: Vec<LineFormat> = content
        .iter()
        .map(|l| line_format::analyze_line(l))
        .collect();
    let n = content.len() as f64;
    let avg_columns = formats.iter().map(|f| f.column_count).sum::<usize>() as f64 / n;
    let facts = ClassifyFacts {
        line_count: content.len(),
        avg_columns,
        near_avg_ratio: formats
            .iter()
            .filter(|f| (f.column_count as f64 - avg_columns).abs() <= 1.0)
            .count() as f64
            / n,
        list_ratio: content
            .iter()
            .copied()
            .filter(|l| line_format::is_list_item(l))
            .count() as f64
            / n,
        key_prefix_ratio: content
            .iter()
            .copied()
            .filter(|l| patterns::key_prefix().is_match(l))
            .count() as f64
            / n,
        all_header: formats.iter().all(|f| f.is_header),
    };
    CLASSIFY_RULES
        .iter()
        .find(|(_, predicate)| predicate(&facts))
        .map(|(block_type, _)| *block_type)
        .unwrap_or(BlockType::Paragraph)
}

/// Classify and attach metadata, producing the finished block.
pub fn classify_block(lines: Vec<String>, start_index: usize, end_index: usize) -> SemanticBlock {
    let block_type = classify_lines(&lines);
    let metadata = extract_metadata(&lines, block_type);
    SemanticBlock {
        lines,
        block_type,
        metadata,
        start_index,
        end_index,
    }
}

/// Metadata extracted regardless of block type; table shape only for
/// table blocks.
pub(crate) fn extract_metadata(lines: &[String], block_type: BlockType) -> BlockMetadata {
    let joined = lines.join("\n");
    let numbers = line_format::numeric_tokens(&joined);
    let numeric_range = numbers
        .iter()
        .copied()
        .fold(None::<(f64, f64)>, |range, n| match range {
            Some((min, max)) => Some((min.min(n), max.max(n))),
            None => Some((n, n)),
        });
    let header_lines: Vec<String> = lines
        .iter()
        .filter(|l| line_format::is_header_like(l.as_str()))
        .take(3)
        .cloned()
        .collect();

    let (table_columns, table_consistency) = if block_type == BlockType::Table {
        let formats: Vec<LineFormat> = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| line_format::analyze_line(l))
            .collect();
        let verdict = crate::structure::tabular_verdict(&formats);
        (Some(verdict.mode_columns), Some(verdict.consistency))
    } else {
        (None, None)
    };

    BlockMetadata {
        numeric_count: numbers.len(),
        numeric_range,
        header_lines,
        language: guess_language(&joined).to_string(),
        table_columns,
        table_consistency,
    }
}

const EN_STOPWORDS: &[&str] = &[
    "the", "and", "of", "to", "in", "is", "for", "with", "on", "this", "that", "are",
];
const ES_STOPWORDS: &[&str] = &[
    "el", "la", "de", "los", "las", "y", "en", "es", "para", "con", "por", "un", "una", "del",
];

/// Dominant-language guess over the block's joined text.
pub(crate) fn guess_language(text: &str) -> &'static str {
    let mut en = 0usize;
    let mut es = 0usize;
    for word in text.split_whitespace() {
        let w = word.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
        if EN_STOPWORDS.contains(&w.as_str()) {
            en += 1;
        }
        if ES_STOPWORDS.contains(&w.as_str()) {
            es += 1;
        }
    }
    if en == 0 && es == 0 {
        "unknown"
    } else if es > en {
        "es"
    } else {
        "en"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(lines: &[&str]) -> BlockType {
        let owned: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        classify_lines(&owned)
    }

    #[test]
    fn tab_rows_classify_as_table() {
        assert_eq!(
            classify(&["ID\tName\tPrice", "1\tbolt\t$1", "2\tnut\t$2"]),
            BlockType::Table
        );
    }

    #[test]
    fn majority_list_items_classify_as_list() {
        assert_eq!(
            classify(&["Groceries", "1. apples", "2. pears", "3. plums"]),
            BlockType::List
        );
    }

    #[test]
    fn checkbox_items_count_as_list() {
        assert_eq!(
            classify(&["- [ ] write tests", "- [x] ship it"]),
            BlockType::List
        );
    }

    #[test]
    fn short_all_header_block_is_header() {
        assert_eq!(
            classify(&["Quarterly Report", "Northern Region"]),
            BlockType::Header
        );
    }

    #[test]
    fn key_value_majority_is_structured() {
        assert_eq!(
            classify(&["host: localhost", "port: fivefour", "a plain line"]),
            BlockType::Structured
        );
    }

    #[test]
    fn prose_falls_through_to_paragraph() {
        assert_eq!(
            classify(&[
                "Plain sentences with no layout at all.",
                "They just continue one after another.",
            ]),
            BlockType::Paragraph
        );
    }

    #[test]
    fn empty_block_is_unknown() {
        assert_eq!(classify(&[]), BlockType::Unknown);
        assert_eq!(classify(&["   ", "\t"]), BlockType::Unknown);
    }

    #[test]
    fn metadata_numeric_range_and_headers() {
        let lines: Vec<String> = ["Inventory Counts", "12 widgets", "40 sprockets", "7 gears"]
            .iter()
            .map(|l| l.to_string())
            .collect();
        let meta = extract_metadata(&lines, BlockType::Paragraph);
        assert_eq!(meta.numeric_count, 3);
        assert_eq!(meta.numeric_range, Some((7.0, 40.0)));
        assert_eq!(meta.header_lines, vec!["Inventory Counts".to_string()]);
    }

    #[test]
    fn metadata_table_shape_only_for_tables() {
        let lines: Vec<String> = ["a\tb", "c\td", "e\tf"].iter().map(|l| l.to_string()).collect();
        let meta = extract_metadata(&lines, BlockType::Table);
        assert_eq!(meta.table_columns, Some(2));
        assert_eq!(meta.table_consistency, Some(1.0));
        let meta = extract_metadata(&lines, BlockType::Paragraph);
        assert_eq!(meta.table_columns, None);
    }

    #[test]
    fn language_guess() {
        assert_eq!(
            guess_language("el precio de la lista es para los clientes"),
            "es"
        );
        assert_eq!(guess_language("the price of the list is for the clients"), "en");
        assert_eq!(guess_language("A23 B24 C25"), "unknown");
    }
}
