//! Whole-document structure analysis.
//!
//! The verdict is advisory: it is handed to callers for diagnostics and
//! never gates per-block chunking decisions, which are made independently.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::line_format::{self, LineFormat};
use crate::patterns;
use crate::types::{MetadataMap, SeparatorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Separator,
    List,
    KeyValue,
    Header,
}

/// One detected layout pattern with its strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructurePattern {
    pub kind: PatternKind,
    pub value: Option<String>,
    pub confidence: f64,
    pub metadata: MetadataMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Unstructured,
    Tabular,
    List,
    Mixed,
    KeyValue,
}

/// One per document; informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStructureAnalysis {
    pub has_structure: bool,
    pub structure_type: StructureType,
    pub patterns: Vec<StructurePattern>,
    pub confidence: f64,
}

/// Candidate separators swept in order; first one clearing its threshold
/// wins (the ordering is the tie-break).
const SEPARATOR_CANDIDATES: [(SeparatorKind, f64); 4] = [
    (SeparatorKind::Tab, 0.3),
    (SeparatorKind::Pipe, 0.3),
    (SeparatorKind::Comma, 0.5),
    (SeparatorKind::MultiSpace, 0.3),
];

const LIST_MATCH_MIN: f64 = 0.2;
const KEY_VALUE_MATCH_MIN: f64 = 0.3;
const TABULAR_SEPARATOR_MIN: f64 = 0.7;
const LIST_TYPE_MIN: f64 = 0.5;
const KEY_VALUE_TYPE_MIN: f64 = 0.5;

/// Analyze the non-empty trimmed lines of a document.
pub fn analyze_structure(lines: &[&str]) -> DocumentStructureAnalysis {
    let mut patterns = Vec::new();
    let mut separator_confidence = 0.0;
    let mut list_confidence = 0.0;
    let mut kv_confidence = 0.0;

    if let Some(pattern) = detect_separator_pattern(lines) {
        separator_confidence = pattern.confidence;
        patterns.push(pattern);
    }
    if let Some(pattern) = detect_list_pattern(lines) {
        list_confidence = pattern.confidence;
        patterns.push(pattern);
    }
    if let Some(pattern) = detect_key_value_pattern(lines) {
        kv_confidence = pattern.confidence;
        patterns.push(pattern);
    }

    let formats: Vec<LineFormat> = lines.iter().map(|l| line_format::analyze_line(l)).collect();
    let verdict = tabular_verdict(&formats);
    if verdict.is_table {
        patterns.push(StructurePattern {
            kind: PatternKind::Header,
            value: None,
            confidence: verdict.confidence,
            metadata: MetadataMap::from([
                ("columns".to_string(), json!(verdict.mode_columns)),
                ("consistency".to_string(), json!(verdict.consistency)),
                ("hasHeader".to_string(), json!(verdict.has_header)),
            ]),
        });
    }

    // Header patterns describe table shape and do not count toward Mixed,
    // otherwise every table with a heading would read as Mixed.
    let content_kinds = [separator_confidence, list_confidence, kv_confidence]
        .iter()
        .filter(|c| **c > 0.0)
        .count();

    let structure_type = if content_kinds > 1 {
        StructureType::Mixed
    } else if separator_confidence > TABULAR_SEPARATOR_MIN {
        StructureType::Tabular
    } else if list_confidence > LIST_TYPE_MIN {
        StructureType::List
    } else if kv_confidence > KEY_VALUE_TYPE_MIN {
        StructureType::KeyValue
    } else {
        StructureType::Unstructured
    };

    let confidence = patterns
        .iter()
        .map(|p| p.confidence)
        .fold(0.0_f64, f64::max);

    DocumentStructureAnalysis {
        has_structure: !patterns.is_empty(),
        structure_type,
        patterns,
        confidence,
    }
}

fn separator_occurrences(line: &str, kind: SeparatorKind) -> usize {
    match kind {
        SeparatorKind::Tab => line.matches('\t').count(),
        SeparatorKind::Pipe => line.matches('|').count(),
        SeparatorKind::Comma => line.matches(',').count(),
        SeparatorKind::MultiSpace => line_format::multi_space_runs(line),
        SeparatorKind::None => 0,
    }
}

fn detect_separator_pattern(lines: &[&str]) -> Option<StructurePattern> {
    if lines.is_empty() {
        return None;
    }
    for (kind, threshold) in SEPARATOR_CANDIDATES {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| separator_occurrences(l, kind))
            .collect();
        let matching: Vec<usize> = counts.iter().copied().filter(|&c| c >= 2).collect();
        let ratio = matching.len() as f64 / lines.len() as f64;
        if ratio >= threshold {
            let avg_per_line = matching.iter().sum::<usize>() as f64 / matching.len() as f64;
            return Some(StructurePattern {
                kind: PatternKind::Separator,
                value: Some(kind.label().to_string()),
                confidence: ratio,
                metadata: MetadataMap::from([(
                    "avgSeparatorsPerLine".to_string(),
                    json!(avg_per_line),
                )]),
            });
        }
    }
    None
}

fn detect_list_pattern(lines: &[&str]) -> Option<StructurePattern> {
    if lines.is_empty() {
        return None;
    }
    let candidates: [(&str, &regex::Regex); 4] = [
        ("numbered", patterns::numbered_item()),
        ("lettered", patterns::lettered_item()),
        ("bulleted", patterns::bullet_item()),
        ("heading", patterns::markdown_heading()),
    ];
    for (name, re) in candidates {
        let matches = lines.iter().copied().filter(|l| re.is_match(l)).count();
        let ratio = matches as f64 / lines.len() as f64;
        if ratio > LIST_MATCH_MIN {
            return Some(StructurePattern {
                kind: PatternKind::List,
                value: Some(name.to_string()),
                confidence: ratio,
                metadata: MetadataMap::from([("matches".to_string(), json!(matches))]),
            });
        }
    }
    None
}

fn detect_key_value_pattern(lines: &[&str]) -> Option<StructurePattern> {
    if lines.is_empty() {
        return None;
    }
    let candidates: [(&str, &regex::Regex); 3] = [
        ("colon", patterns::kv_colon()),
        ("equals", patterns::kv_equals()),
        ("arrow", patterns::kv_arrow()),
    ];
    // Highest raw match count wins; ties keep the earlier candidate.
    let (name, matches) = candidates
        .iter()
        .enumerate()
        .map(|(i, (name, re))| {
            (i, *name, lines.iter().copied().filter(|l| re.is_match(l)).count())
        })
        .max_by(|a, b| a.2.cmp(&b.2).then(b.0.cmp(&a.0)))
        .map(|(_, name, count)| (name, count))?;
    let ratio = matches as f64 / lines.len() as f64;
    if ratio > KEY_VALUE_MATCH_MIN {
        Some(StructurePattern {
            kind: PatternKind::KeyValue,
            value: Some(name.to_string()),
            confidence: ratio,
            metadata: MetadataMap::from([("matches".to_string(), json!(matches))]),
        })
    } else {
        None
    }
}

/// Table shape verdict over per-line formats.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TabularVerdict {
    pub is_table: bool,
    pub mode_columns: usize,
    pub consistency: f64,
    pub has_header: bool,
    pub confidence: f64,
}

pub(crate) fn tabular_verdict(formats: &[LineFormat]) -> TabularVerdict {
    if formats.is_empty() {
        return TabularVerdict {
            is_table: false,
            mode_columns: 0,
            consistency: 0.0,
            has_header: false,
            confidence: 0.0,
        };
    }
    let mode_columns = mode_column_count(formats);
    let consistency = formats
        .iter()
        .filter(|f| f.column_count == mode_columns)
        .count() as f64
        / formats.len() as f64;
    let has_header = formats.iter().take(3).any(|f| f.is_header);
    let sep_ratio =
        formats.iter().filter(|f| f.has_separator).count() as f64 / formats.len() as f64;
    let is_table = consistency > 0.7 && mode_columns > 1 && sep_ratio > 0.7;
    let header_bonus = if has_header { 0.2 } else { 0.0 };
    let confidence = ((consistency + sep_ratio + header_bonus) / 2.2).min(1.0);
    TabularVerdict {
        is_table,
        mode_columns,
        consistency,
        has_header,
        confidence,
    }
}

/// Most frequent column count; ties break toward the wider layout.
fn mode_column_count(formats: &[LineFormat]) -> usize {
    let mut counts: std::collections::BTreeMap<usize, usize> = std::collections::BTreeMap::new();
    for f in formats {
        *counts.entry(f.column_count).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(cols, _)| cols)
        .unwrap_or(0)
}
