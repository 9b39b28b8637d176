//! Embedding-time prefix enrichment.
//!
//! Re-runs the detectors over a chunk's text alone and prepends
//! human-readable tags before vectorization. Only the embedded text
//! changes; chunk boundaries and stored metadata stay untouched.

use crate::criticality::{self, CHUNK_NUMERIC_MIN};
use crate::line_format;
use crate::structure;

/// A document-type category only wins when its summed keyword weight
/// exceeds this.
pub const DOC_TYPE_WEIGHT_MIN: f64 = 2.0;

struct DocTypeCategory {
    label: &'static str,
    keywords: &'static [(&'static str, f64)],
}

const DOC_TYPE_CATEGORIES: &[DocTypeCategory] = &[
    DocTypeCategory {
        label: "pricing",
        keywords: &[
            ("precio", 2.0),
            ("price", 2.0),
            ("tarifa", 1.5),
            ("rate", 1.0),
            ("descuento", 1.0),
            ("discount", 1.0),
            ("$", 0.5),
            ("€", 0.5),
        ],
    },
    DocTypeCategory {
        label: "invoice",
        keywords: &[
            ("factura", 2.0),
            ("invoice", 2.0),
            ("subtotal", 1.5),
            ("iva", 1.0),
            ("tax", 1.0),
            ("pago", 1.0),
            ("payment", 1.0),
            ("vencimiento", 1.0),
        ],
    },
    DocTypeCategory {
        label: "technical",
        keywords: &[
            ("especificación", 2.0),
            ("specification", 2.0),
            ("manual", 1.5),
            ("modelo", 1.0),
            ("voltage", 1.0),
            ("voltaje", 1.0),
            ("instalación", 1.0),
            ("installation", 1.0),
        ],
    },
    DocTypeCategory {
        label: "legal",
        keywords: &[
            ("contrato", 2.0),
            ("contract", 2.0),
            ("cláusula", 1.5),
            ("clause", 1.5),
            ("agreement", 1.0),
            ("liability", 1.0),
            ("jurisdicción", 1.0),
            ("terms", 1.0),
        ],
    },
];

/// Decide the prefix tags for a chunk and return the enriched text.
pub fn enrich_for_embedding(content: &str) -> String {
    let mut tags: Vec<String> = Vec::new();

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let analysis = structure::analyze_structure(&lines);
    if analysis.has_structure {
        tags.push(format!("[{}]", structure_label(analysis.structure_type)));
    }

    let verdict = criticality::assess_chunk(content);
    if verdict.is_price_table {
        tags.push("[price-table]".to_string());
    } else if verdict.is_critical {
        tags.push("[comparison-critical]".to_string());
    }

    if line_format::numeric_tokens(content).len() >= CHUNK_NUMERIC_MIN {
        tags.push("[numeric]".to_string());
    }

    tags.push(format!("[{}]", classify_document_type(content)));

    if tags.is_empty() {
        content.to_string()
    } else {
        format!("{} {content}", tags.join(" "))
    }
}

fn structure_label(structure_type: structure::StructureType) -> &'static str {
    match structure_type {
        structure::StructureType::Unstructured => "unstructured",
        structure::StructureType::Tabular => "tabular",
        structure::StructureType::List => "list",
        structure::StructureType::Mixed => "mixed",
        structure::StructureType::KeyValue => "key-value",
    }
}

/// Fixed weighted-keyword classifier; falls back to "general" when no
/// category clears the weight floor.
pub fn classify_document_type(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    let mut best: Option<(&'static str, f64)> = None;
    for category in DOC_TYPE_CATEGORIES {
        let weight: f64 = category
            .keywords
            .iter()
            .filter(|(kw, _)| lowered.contains(kw))
            .map(|(_, w)| w)
            .sum();
        if weight > DOC_TYPE_WEIGHT_MIN && best.map_or(true, |(_, w)| weight > w) {
            best = Some((category.label, weight));
        }
    }
    best.map(|(label, _)| label).unwrap_or("general")
}
