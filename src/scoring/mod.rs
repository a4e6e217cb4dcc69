// Scoring module
// Term-frequency ranking of chunks against a query, with an enhanced mode
// used when a semantic-assist collaborator is available

#[cfg(test)]
mod tests;

use anyhow::{Result, bail};
use itertools::Itertools;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::models::{Chunk, ScoredResult};

/// Optional collaborator that unlocks enhanced scoring when reachable.
/// When absent or unavailable, searches use basic keyword scoring.
pub trait SemanticAssist: Send + Sync {
    fn is_available(&self) -> bool;
}

/// Score applied when the whole query appears verbatim in a chunk
const PHRASE_MATCH_BONUS: f64 = 5.0;
/// Weight of the matched-terms coverage ratio
const COVERAGE_BONUS: f64 = 3.0;
/// Score of the single best-effort result returned when no term matches a
/// non-empty index
const NO_MATCH_FALLBACK_SCORE: f64 = 0.1;

pub struct ScoringEngine {
    assist: Option<Arc<dyn SemanticAssist>>,
}

impl ScoringEngine {
    #[inline]
    pub fn new(assist: Option<Arc<dyn SemanticAssist>>) -> Self {
        Self { assist }
    }

    /// Rank chunks against a query, highest score first, ties kept in
    /// insertion order. `top_k` of zero yields no results. Enhanced
    /// scoring is used when the semantic-assist collaborator is available;
    /// any internal scoring error falls back to basic mode rather than
    /// surfacing.
    #[inline]
    pub fn score(&self, query: &str, chunks: &[Chunk], top_k: usize) -> Vec<ScoredResult> {
        if top_k == 0 {
            return Vec::new();
        }

        if self.assist.as_ref().is_some_and(|a| a.is_available()) {
            match self.enhanced(query, chunks) {
                Ok(mut results) => {
                    debug!(
                        "Enhanced scoring matched {} of {} chunks",
                        results.len(),
                        chunks.len()
                    );
                    results.truncate(top_k);
                    return results;
                }
                Err(e) => {
                    warn!("Enhanced scoring failed, retrying in basic mode: {}", e);
                }
            }
        }

        self.basic(query, chunks, top_k)
    }

    /// Phrase bonus plus per-term occurrence counts plus a coverage bonus
    fn enhanced(&self, query: &str, chunks: &[Chunk]) -> Result<Vec<ScoredResult>> {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().unique().collect();
        if terms.is_empty() {
            bail!("query has no scorable terms");
        }

        let mut results = Vec::new();
        for chunk in chunks {
            let content_lower = chunk.content.to_lowercase();

            let mut score = 0.0;
            if content_lower.contains(&query_lower) {
                score += PHRASE_MATCH_BONUS;
            }

            let mut matched = 0_usize;
            for term in &terms {
                let occurrences = content_lower.matches(term).count();
                if occurrences > 0 {
                    matched += 1;
                    score += occurrences as f64;
                }
            }

            if matched > 0 {
                score += COVERAGE_BONUS * (matched as f64 / terms.len() as f64);
            }

            if score > 0.0 {
                results.push(ScoredResult {
                    content: chunk.content.clone(),
                    metadata: chunk.result_metadata(),
                    relevance_score: score,
                });
            }
        }

        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        Ok(results)
    }

    /// Count of distinct query terms appearing in the chunk. When nothing
    /// matches but chunks exist, one arbitrary chunk is returned at a
    /// nominal score as a best-effort signal; callers wanting strict
    /// matches can filter on the score.
    fn basic(&self, query: &str, chunks: &[Chunk], top_k: usize) -> Vec<ScoredResult> {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().unique().collect();

        let mut results = Vec::new();
        for chunk in chunks {
            let content_lower = chunk.content.to_lowercase();
            let score = terms.iter().filter(|t| content_lower.contains(**t)).count();

            if score > 0 {
                results.push(ScoredResult {
                    content: chunk.content.clone(),
                    metadata: chunk.result_metadata(),
                    relevance_score: score as f64,
                });
            }
        }

        if results.is_empty() {
            return chunks
                .first()
                .map(|chunk| ScoredResult {
                    content: chunk.content.clone(),
                    metadata: chunk.result_metadata(),
                    relevance_score: NO_MATCH_FALLBACK_SCORE,
                })
                .into_iter()
                .collect();
        }

        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        results.truncate(top_k);

        results
    }
}
