//! End-to-end pipeline tests: segmentation through chunk construction.

use uuid::Uuid;

use chunkmill_chunking::builder::BLOCK_POSITION_STRIDE;
use chunkmill_chunking::DocumentChunker;
use chunkmill_core::{ChunkingConfig, DocumentRef};

fn make_doc() -> DocumentRef {
    DocumentRef::new(
        Uuid::from_u128(0x1111),
        Uuid::from_u128(0x2222),
        Uuid::from_u128(0x3333),
    )
}

fn make_chunker(chunk_size: usize, chunk_overlap: usize) -> DocumentChunker {
    DocumentChunker::new(ChunkingConfig {
        chunk_size,
        chunk_overlap,
        max_tokens: 512,
    })
}

fn price_table_text(rows: usize) -> String {
    let mut lines = vec!["ID  Unidad  Precio".to_string()];
    for i in 0..rows {
        let price = 10 + ((i * 17) % 80);
        lines.push(format!("A{i:02}  pieza  ${price}.50"));
    }
    lines.join("\n")
}

// ── Scenario A: price table routed to the specialization ────────────

#[test]
fn price_table_block_produces_all_three_families() {
    let text = price_table_text(39);
    let output = make_chunker(300, 0).chunk(&text, &make_doc()).unwrap();

    let sorted: Vec<_> = output
        .chunks
        .iter()
        .filter(|c| c.id.ends_with("-sorted"))
        .collect();
    let tiers: Vec<_> = output
        .chunks
        .iter()
        .filter(|c| c.id.contains("-tier-"))
        .collect();
    let sections: Vec<_> = output
        .chunks
        .iter()
        .filter(|c| c.id.contains("-sec"))
        .collect();

    assert_eq!(sorted.len(), 1);
    assert_eq!(tiers.len(), 3);
    assert_eq!(sections.len(), 3, "ceil(39/15) section windows");
    assert_eq!(output.chunks.len(), 7);

    for chunk in &output.chunks {
        assert_eq!(chunk.metadata["isPriceTable"], true);
        assert_eq!(chunk.metadata["isComparisonCritical"], true);
        assert!(chunk.content.starts_with("ID  Unidad  Precio"));
    }
}

// ── Scenario B: short prose paragraph ───────────────────────────────

#[test]
fn short_prose_block_yields_one_complete_chunk() {
    let text = "This is plain prose without structure.\n\
                It goes on for a few lines.\n\
                Nothing here looks like a table.\n\
                There are no list markers either.\n\
                Just sentences following sentences.";
    let output = make_chunker(1000, 200).chunk(text, &make_doc()).unwrap();
    assert_eq!(output.chunks.len(), 1);
    assert_eq!(output.chunks[0].metadata["isCompleteBlock"], true);
    assert_eq!(output.chunks[0].metadata["blockType"], "paragraph");
}

// ── Scenario C: double blank line splits blocks ─────────────────────

#[test]
fn double_blank_line_produces_two_blocks() {
    let text = "First part of the document sits here.\n\n\nSecond part starts after the gap.";
    let output = make_chunker(1000, 200).chunk(text, &make_doc()).unwrap();
    assert_eq!(output.chunks.len(), 2);
    assert_eq!(output.chunks[0].position, 0);
    assert_eq!(output.chunks[1].position, BLOCK_POSITION_STRIDE);
    assert!(output.chunks[0].content.contains("First part"));
    assert!(output.chunks[1].content.contains("Second part"));
}

// ── Scenario D: list context prefix repeats across chunks ───────────

#[test]
fn long_list_repeats_context_prefix_in_every_chunk() {
    let pad = |mut s: String| {
        while s.len() < 40 {
            s.push('x');
        }
        s
    };
    let context_a = pad("product catalog for northern stores ".to_string());
    let context_b = pad("updated list of approved goods ".to_string());
    let mut lines = vec![context_a.clone(), context_b.clone()];
    for i in 1..=20 {
        lines.push(pad(format!("{i:02}. approved item number {i:02} ")));
    }
    let text = lines.join("\n");
    let output = make_chunker(400, 0).chunk(&text, &make_doc()).unwrap();

    assert_eq!(output.chunks.len(), 3, "sized for exactly three chunks");
    let prefix = format!("{context_a}\n{context_b}");
    for chunk in &output.chunks {
        assert!(
            chunk.content.starts_with(&prefix),
            "every chunk repeats the context prefix verbatim"
        );
    }
}

// ── Ordering and idempotence ────────────────────────────────────────

fn mixed_document() -> String {
    let mut parts = vec![
        "An opening paragraph explaining what this document contains in plain language."
            .to_string(),
    ];
    parts.push(String::new());
    parts.push(String::new());
    parts.push(price_table_text(20));
    parts.push(String::new());
    parts.push(String::new());
    parts.push("Closing Notes".to_string());
    parts.push("1. keep the table up to date".to_string());
    parts.push("2. review prices quarterly".to_string());
    parts.join("\n")
}

#[test]
fn positions_are_sorted_and_reconstruct_block_order() {
    let text = mixed_document();
    let output = make_chunker(150, 30).chunk(&text, &make_doc()).unwrap();

    let positions: Vec<usize> = output.chunks.iter().map(|c| c.position).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted, "chunks arrive ordered by position");

    let block_of = |position: usize| position / BLOCK_POSITION_STRIDE;
    let blocks: Vec<usize> = positions.iter().map(|p| block_of(*p)).collect();
    let mut dedup = blocks.clone();
    dedup.dedup();
    let mut strictly_increasing = dedup.clone();
    strictly_increasing.sort();
    strictly_increasing.dedup();
    assert_eq!(dedup, strictly_increasing, "block order is preserved");
}

#[test]
fn identical_input_produces_identical_output() {
    let text = mixed_document();
    let chunker = make_chunker(150, 30);
    let doc = make_doc();
    let first = chunker.chunk(&text, &doc).unwrap();
    let second = chunker.chunk(&text, &doc).unwrap();
    assert_eq!(first.chunks, second.chunks);
    assert_eq!(first.summary, second.summary);
}

// ── Coverage ────────────────────────────────────────────────────────

#[test]
fn table_and_list_data_lines_are_never_dropped() {
    let text = mixed_document();
    let output = make_chunker(150, 30).chunk(&text, &make_doc()).unwrap();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        assert!(
            output.chunks.iter().any(|c| c.content.contains(line)),
            "line {line:?} must survive chunking"
        );
    }
}

#[test]
fn window_strategy_covers_the_whole_paragraph() {
    let words: Vec<String> = (0..200).map(|i| format!("prose{i:03}")).collect();
    let text = words.join(" ");
    let output = make_chunker(120, 30).chunk(&text, &make_doc()).unwrap();
    assert!(output.chunks.len() > 1);
    for word in &words {
        assert!(output.chunks.iter().any(|c| c.content.contains(word)));
    }
}

// ── Error handling ──────────────────────────────────────────────────

#[test]
fn empty_document_is_a_processing_failure() {
    let chunker = make_chunker(1000, 200);
    assert!(chunker.chunk("", &make_doc()).is_err());
    assert!(chunker.chunk("   \n\n \t \n", &make_doc()).is_err());
}

// ── Summary ─────────────────────────────────────────────────────────

#[test]
fn summary_digests_mirror_the_chunk_list() {
    let text = mixed_document();
    let output = make_chunker(150, 30).chunk(&text, &make_doc()).unwrap();
    assert_eq!(output.summary.chunk_count, output.chunks.len());
    assert_eq!(output.summary.chunk_size, 150);
    assert_eq!(output.summary.chunk_overlap, 30);
    for (digest, chunk) in output.summary.chunks.iter().zip(&output.chunks) {
        assert_eq!(digest.id, chunk.id);
        assert_eq!(digest.position, chunk.position);
        assert_eq!(digest.token_count, chunk.token_count);
    }
}

#[test]
fn token_counts_follow_the_word_estimate() {
    let text = "Seven words are in this short sentence.";
    let output = make_chunker(1000, 0).chunk(text, &make_doc()).unwrap();
    // ceil(7 * 1.33) = 10
    assert_eq!(output.chunks[0].token_count, 10);
}

#[test]
fn structure_analysis_rides_along_without_gating() {
    let text = price_table_text(10);
    let output = make_chunker(5000, 0).chunk(&text, &make_doc()).unwrap();
    // Block fits the budget, so chunking emits one complete chunk no
    // matter what the document-level analysis said.
    assert_eq!(output.chunks.len(), 1);
    assert!(output.structure.has_structure);
}
