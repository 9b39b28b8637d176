//! Heuristics that flag content carrying comparable records (prices,
//! quantities, rankings) that naive splitting would fragment.
//!
//! All detectors are pure functions of their input text and recompute
//! every call; verdicts are never persisted.

use serde::Serialize;
use serde_json::json;

use crate::line_format;
use crate::patterns;
use crate::types::MetadataMap;

// Empirically tuned defaults, not guaranteed-optimal values.
pub const TABLE_KEYWORD_MIN: usize = 2;
pub const TABLE_NUMERIC_MIN: usize = 5;
pub const TABLE_AVG_COLUMNS_MIN: f64 = 2.0;
pub const TABLE_SCORE_MIN: u32 = 2;
pub const PRICE_CURRENCY_TOKENS_MIN: usize = 3;
pub const CHUNK_KEYWORD_MIN: usize = 2;
pub const CHUNK_NUMERIC_MIN: usize = 3;

const PRICE_TERMS: &[&str] = &[
    "price", "precio", "cost", "costo", "rate", "tarifa", "fee", "importe", "amount", "monto",
    "total", "$", "€", "usd", "eur", "mxn",
];
const UNIT_TERMS: &[&str] = &[
    "unit", "unidad", "qty", "quantity", "cantidad", "pieza", "pcs", "docena", "dozen", "kg",
    "litro", "liter",
];
const IDENTIFIER_TERMS: &[&str] = &[
    "id", "sku", "code", "código", "codigo", "ref", "referencia", "item", "artículo", "articulo",
    "model", "modelo", "part",
];
const DIMENSION_TERMS: &[&str] = &[
    "size", "medida", "width", "ancho", "height", "alto", "length", "largo", "weight", "peso",
    "depth", "dimension",
];

/// Outcome of a criticality check, with the raw signals for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CriticalityVerdict {
    pub is_critical: bool,
    pub is_price_table: bool,
    pub signals: MetadataMap,
}

/// Count distinct vocabulary terms present in `text` (case-insensitive
/// substring match).
fn distinct_matches(text: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| text.contains(*t)).count()
}

fn currency_token_count(text: &str) -> usize {
    patterns::currency_amount().find_iter(text).count()
}

/// Table-level detector; decides the chunking strategy for a block.
///
/// 2-of-3 score over keyword matches, numeric density and column shape,
/// then the stricter price-table confirmation on top (all three legs must
/// hold simultaneously).
pub fn assess_table(header_lines: &[String], data_lines: &[String]) -> CriticalityVerdict {
    let combined = header_lines
        .iter()
        .chain(data_lines.iter())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let lowered = combined.to_lowercase();

    let keyword_matches = distinct_matches(&lowered, PRICE_TERMS)
        + distinct_matches(&lowered, UNIT_TERMS)
        + distinct_matches(&lowered, IDENTIFIER_TERMS)
        + distinct_matches(&lowered, DIMENSION_TERMS);
    let numeric_count = line_format::numeric_tokens(&combined).len();
    let content_lines = combined.lines().filter(|l| !l.trim().is_empty()).count();
    let avg_columns = if content_lines == 0 {
        0.0
    } else {
        combined
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| line_format::analyze_line(l).column_count)
            .sum::<usize>() as f64
            / content_lines as f64
    };

    let score = u32::from(keyword_matches >= TABLE_KEYWORD_MIN)
        + u32::from(numeric_count >= TABLE_NUMERIC_MIN)
        + u32::from(avg_columns >= TABLE_AVG_COLUMNS_MIN);
    let is_critical = score >= TABLE_SCORE_MIN;

    let currency_tokens = currency_token_count(&combined);
    let is_price_table = distinct_matches(&lowered, PRICE_TERMS) >= 1
        && (distinct_matches(&lowered, UNIT_TERMS) + distinct_matches(&lowered, IDENTIFIER_TERMS))
            >= 1
        && currency_tokens >= PRICE_CURRENCY_TOKENS_MIN;

    CriticalityVerdict {
        is_critical,
        is_price_table,
        signals: signals(keyword_matches, numeric_count, avg_columns, currency_tokens, score),
    }
}

/// Chunk-level detector used by embedding-time enrichment; looser than the
/// table-level score.
pub fn assess_chunk(text: &str) -> CriticalityVerdict {
    let lowered = text.to_lowercase();
    let keyword_matches = distinct_matches(&lowered, PRICE_TERMS)
        + distinct_matches(&lowered, UNIT_TERMS)
        + distinct_matches(&lowered, IDENTIFIER_TERMS)
        + distinct_matches(&lowered, DIMENSION_TERMS);
    let numeric_count = line_format::numeric_tokens(text).len();
    let is_critical = keyword_matches >= CHUNK_KEYWORD_MIN && numeric_count >= CHUNK_NUMERIC_MIN;

    let currency_tokens = currency_token_count(text);
    let is_price_table = distinct_matches(&lowered, PRICE_TERMS) >= 1
        && (distinct_matches(&lowered, UNIT_TERMS) + distinct_matches(&lowered, IDENTIFIER_TERMS))
            >= 1
        && currency_tokens >= PRICE_CURRENCY_TOKENS_MIN;

    CriticalityVerdict {
        is_critical,
        is_price_table,
        signals: signals(keyword_matches, numeric_count, 0.0, currency_tokens, 0),
    }
}

fn signals(
    keyword_matches: usize,
    numeric_count: usize,
    avg_columns: f64,
    currency_tokens: usize,
    score: u32,
) -> MetadataMap {
    MetadataMap::from([
        ("keywordMatches".to_string(), json!(keyword_matches)),
        ("numericTokens".to_string(), json!(numeric_count)),
        ("avgColumns".to_string(), json!(avg_columns)),
        ("currencyTokens".to_string(), json!(currency_tokens)),
        ("score".to_string(), json!(score)),
    ])
}
