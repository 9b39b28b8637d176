//! Price-table specialization: three chunk families that keep ranking and
//! extremum queries answerable after embedding.
//!
//! Every chunk here is tagged comparison-critical and price-table. The
//! families are a sorted-values chunk, up to three range buckets over the
//! sorted amounts, and fixed windows over the original row order.

use std::cmp::Ordering;

use serde_json::json;

use crate::line_format::parse_number;
use crate::patterns;
use crate::types::{Chunk, MetadataMap};

use super::{BlockContext, ChunkSpec, PRICE_FAMILY_STRIDE};

/// Section windows over the original row order (empirically tuned default).
pub const SECTION_ROWS: usize = 15;
/// Contiguous buckets over the sorted amounts.
pub const RANGE_BUCKETS: usize = 3;

const TIER_LABELS: [&str; RANGE_BUCKETS] = ["low", "mid", "high"];

pub(crate) fn chunk_price_table(
    ctx: &BlockContext,
    header_lines: &[String],
    data_lines: &[String],
) -> Vec<Chunk> {
    let header_text = header_lines.join("\n");

    // One amount per data line: the first currency-like token. Lines that
    // fail to parse stay in the content but never enter the aggregates.
    let mut priced: Vec<(f64, &String)> = Vec::new();
    let mut unpriced: Vec<&String> = Vec::new();
    for line in data_lines {
        match first_currency_amount(line) {
            Some(amount) => priced.push((amount, line)),
            None => {
                tracing::debug!(line = %line, "price-table line without a parseable amount");
                unpriced.push(line);
            }
        }
    }
    priced.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut chunks = Vec::new();
    chunks.push(sorted_values_chunk(ctx, &header_text, &priced, &unpriced, data_lines.len()));
    chunks.extend(range_bucket_chunks(ctx, &header_text, &priced));
    chunks.extend(section_chunks(ctx, &header_text, data_lines));
    chunks
}

fn sorted_values_chunk(
    ctx: &BlockContext,
    header_text: &str,
    priced: &[(f64, &String)],
    unpriced: &[&String],
    data_row_count: usize,
) -> Chunk {
    let mut content = header_text.to_string();
    for (_, line) in priced {
        content.push('\n');
        content.push_str(line.as_str());
    }
    for line in unpriced {
        content.push('\n');
        content.push_str(line.as_str());
    }
    if let (Some((min, _)), Some((max, _))) = (priced.first(), priced.last()) {
        content.push('\n');
        content.push_str(&format!(
            "Summary: min={min:.2} max={max:.2} count={}",
            priced.len()
        ));
    }
    super::finish_chunk(
        ctx,
        ChunkSpec {
            content,
            seq: 0,
            suffix: Some("sorted".to_string()),
            offset: 0,
            extra: price_flags("price-sorted", data_row_count, None),
        },
    )
}

fn range_bucket_chunks(
    ctx: &BlockContext,
    header_text: &str,
    priced: &[(f64, &String)],
) -> Vec<Chunk> {
    let total = priced.len();
    if total == 0 {
        return Vec::new();
    }
    let base = total / RANGE_BUCKETS;
    let remainder = total % RANGE_BUCKETS;

    let mut chunks = Vec::new();
    let mut cursor = 0usize;
    for (index, label) in TIER_LABELS.iter().enumerate() {
        let len = base + usize::from(index < remainder);
        if len == 0 {
            continue;
        }
        let bucket = &priced[cursor..cursor + len];
        cursor += len;

        let mut content = header_text.to_string();
        for (_, line) in bucket {
            content.push('\n');
            content.push_str(line.as_str());
        }
        let min = bucket.first().map(|(v, _)| *v).unwrap_or_default();
        let max = bucket.last().map(|(v, _)| *v).unwrap_or_default();
        content.push('\n');
        content.push_str(&format!("Tier {label}: min={min:.2} max={max:.2}"));

        let mut extra = price_flags("price-range", bucket.len(), Some(*label));
        extra.insert("tierIndex".into(), json!(index));
        chunks.push(super::finish_chunk(
            ctx,
            ChunkSpec {
                content,
                seq: index,
                suffix: Some(format!("tier-{label}")),
                offset: PRICE_FAMILY_STRIDE + index,
                extra,
            },
        ));
    }
    chunks
}

fn section_chunks(ctx: &BlockContext, header_text: &str, data_lines: &[String]) -> Vec<Chunk> {
    let section_count = data_lines.len().div_ceil(SECTION_ROWS);
    data_lines
        .chunks(SECTION_ROWS)
        .enumerate()
        .map(|(index, window)| {
            let mut content = header_text.to_string();
            for line in window {
                content.push('\n');
                content.push_str(line);
            }
            content.push('\n');
            content.push_str(&format!("Section {}/{section_count}", index + 1));

            let mut extra = price_flags("price-section", window.len(), None);
            extra.insert("sectionIndex".into(), json!(index));
            extra.insert("sectionCount".into(), json!(section_count));
            super::finish_chunk(
                ctx,
                ChunkSpec {
                    content,
                    seq: index,
                    suffix: Some(format!("sec{index}")),
                    offset: 2 * PRICE_FAMILY_STRIDE + index,
                    extra,
                },
            )
        })
        .collect()
}

fn price_flags(strategy: &str, row_count: usize, tier: Option<&str>) -> MetadataMap {
    let mut map = MetadataMap::from([
        ("strategy".to_string(), json!(strategy)),
        ("hasHeaders".to_string(), json!(true)),
        ("isComparisonCritical".to_string(), json!(true)),
        ("isPriceTable".to_string(), json!(true)),
        ("dataRowCount".to_string(), json!(row_count)),
    ]);
    if let Some(tier) = tier {
        map.insert("tier".into(), json!(tier));
    }
    map
}

/// First currency-like token on the line, parsed to its numeric value.
pub(crate) fn first_currency_amount(line: &str) -> Option<f64> {
    let matched = patterns::currency_amount().find(line)?;
    parse_number(matched.as_str())
}
