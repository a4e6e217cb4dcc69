use super::*;
use crate::store::models::EntityKind;
use std::collections::BTreeMap;

struct AlwaysAvailable;

impl SemanticAssist for AlwaysAvailable {
    fn is_available(&self) -> bool {
        true
    }
}

struct NeverAvailable;

impl SemanticAssist for NeverAvailable {
    fn is_available(&self) -> bool {
        false
    }
}

fn doc_chunk(entity_id: &str, ordinal: usize, content: &str) -> Chunk {
    let mut extra_metadata = BTreeMap::new();
    extra_metadata.insert("title".to_string(), format!("Title {}", entity_id));
    Chunk {
        chunk_id: format!("{}_{}", entity_id, ordinal),
        entity_id: entity_id.to_string(),
        kind: EntityKind::Document,
        content: content.to_string(),
        ordinal,
        extra_metadata,
    }
}

fn basic_engine() -> ScoringEngine {
    ScoringEngine::new(None)
}

fn enhanced_engine() -> ScoringEngine {
    ScoringEngine::new(Some(Arc::new(AlwaysAvailable)))
}

#[test]
fn basic_counts_distinct_matching_terms() {
    let chunks = vec![
        doc_chunk("d1", 0, "alpha beta gamma"),
        doc_chunk("d2", 0, "alpha alpha alpha"),
    ];

    let results = basic_engine().score("alpha beta", &chunks, 10);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].metadata["document_id"], "d1");
    assert_eq!(results[0].relevance_score, 2.0);
    assert_eq!(results[1].metadata["document_id"], "d2");
    assert_eq!(results[1].relevance_score, 1.0);
}

#[test]
fn repeated_query_terms_count_once() {
    let chunks = vec![doc_chunk("d1", 0, "alpha beta")];

    let results = basic_engine().score("alpha alpha alpha", &chunks, 10);

    assert_eq!(results[0].relevance_score, 1.0);
}

#[test]
fn empty_index_returns_no_results() {
    let results = basic_engine().score("anything", &[], 10);
    assert!(results.is_empty());
}

#[test]
fn no_match_on_non_empty_index_returns_single_fallback() {
    let chunks = vec![
        doc_chunk("d1", 0, "alpha beta"),
        doc_chunk("d2", 0, "gamma delta"),
    ];

    let results = basic_engine().score("zzz unmatched", &chunks, 10);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "alpha beta");
    assert_eq!(results[0].relevance_score, 0.1);
}

#[test]
fn zero_top_k_returns_no_results() {
    let chunks = vec![doc_chunk("d1", 0, "alpha")];

    assert!(basic_engine().score("alpha", &chunks, 0).is_empty());
    assert!(enhanced_engine().score("alpha", &chunks, 0).is_empty());
}

#[test]
fn top_k_truncates_ranked_results() {
    let chunks = vec![
        doc_chunk("d1", 0, "alpha"),
        doc_chunk("d2", 0, "alpha beta"),
        doc_chunk("d3", 0, "alpha beta gamma"),
    ];

    let results = basic_engine().score("alpha beta gamma", &chunks, 2);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].metadata["document_id"], "d3");
    assert_eq!(results[1].metadata["document_id"], "d2");
}

#[test]
fn ties_keep_insertion_order() {
    let chunks = vec![
        doc_chunk("d1", 0, "alpha gamma"),
        doc_chunk("d2", 0, "alpha delta"),
        doc_chunk("d3", 0, "alpha epsilon"),
    ];

    let results = basic_engine().score("alpha", &chunks, 10);

    let ids: Vec<&str> = results
        .iter()
        .map(|r| r.metadata["document_id"].as_str())
        .collect();
    assert_eq!(ids, vec!["d1", "d2", "d3"]);
}

#[test]
fn enhanced_phrase_match_outscores_scattered_terms() {
    let chunks = vec![
        doc_chunk(
            "scattered",
            0,
            "The report was filed after the outage, which happened quarterly.",
        ),
        doc_chunk(
            "phrase",
            0,
            "See the quarterly outage report for the full timeline.",
        ),
    ];

    let results = enhanced_engine().score("quarterly outage report", &chunks, 10);

    assert_eq!(results[0].metadata["document_id"], "phrase");
    assert!(results[0].relevance_score > results[1].relevance_score);
    // Exact phrase bonus plus one occurrence per term plus full coverage
    assert_eq!(results[0].relevance_score, 5.0 + 3.0 + 3.0);
}

#[test]
fn enhanced_counts_term_occurrences() {
    let chunks = vec![
        doc_chunk("d1", 0, "backup backup backup"),
        doc_chunk("d2", 0, "backup"),
    ];

    let results = enhanced_engine().score("backup", &chunks, 10);

    // Both get the phrase bonus and full coverage; d1 adds two extra
    // occurrences.
    assert_eq!(results[0].metadata["document_id"], "d1");
    assert_eq!(results[0].relevance_score, 5.0 + 3.0 + 3.0);
    assert_eq!(results[1].relevance_score, 5.0 + 1.0 + 3.0);
}

#[test]
fn enhanced_excludes_non_positive_scores() {
    let chunks = vec![doc_chunk("d1", 0, "nothing relevant here")];

    let results = enhanced_engine().score("quarterly outage", &chunks, 10);

    assert!(results.is_empty());
}

#[test]
fn unavailable_assist_uses_basic_mode() {
    let engine = ScoringEngine::new(Some(Arc::new(NeverAvailable)));
    let chunks = vec![doc_chunk("d1", 0, "quarterly outage report inline")];

    let results = engine.score("quarterly outage report", &chunks, 10);

    // Basic mode: three distinct terms, no phrase bonus
    assert_eq!(results[0].relevance_score, 3.0);
}

#[test]
fn enhanced_empty_query_falls_back_to_basic() {
    let chunks = vec![doc_chunk("d1", 0, "alpha beta")];

    // No scorable terms makes enhanced mode fail internally; basic mode
    // then applies its no-match fallback.
    let results = enhanced_engine().score("   ", &chunks, 10);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].relevance_score, 0.1);
}

#[test]
fn result_metadata_carries_id_title_and_ordinal() {
    let chunks = vec![doc_chunk("d1", 4, "alpha")];

    let results = basic_engine().score("alpha", &chunks, 10);

    assert_eq!(results[0].metadata["document_id"], "d1");
    assert_eq!(results[0].metadata["title"], "Title d1");
    assert_eq!(results[0].metadata["chunk"], "4");
}
