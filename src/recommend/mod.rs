// Recommendation module
// Name-weighted keyword matching of automations and dashboards against
// free text such as an incident description


use itertools::Itertools;
use tracing::debug;

use crate::store::models::Chunk;

/// Weight of a query term found in the entity display name
const NAME_MATCH_WEIGHT: u32 = 2;
/// Weight of a query term found in the description content
const CONTENT_MATCH_WEIGHT: u32 = 1;

/// Rank single-chunk entities (automations, dashboards) against free
/// text and return their ids, best match first. Terms matching the display
/// name count double; entities with no matching term are excluded; ties
/// keep insertion order; the list is truncated to `top_k`.
#[inline]
pub fn rank_entities(chunks: &[Chunk], text: &str, top_k: usize) -> Vec<String> {
    if top_k == 0 {
        return Vec::new();
    }

    let text_lower = text.to_lowercase();
    let terms: Vec<&str> = text_lower.split_whitespace().unique().collect();

    let mut scored = Vec::new();
    for chunk in chunks {
        let name = chunk
            .extra_metadata
            .get(chunk.kind.label_key())
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        let content = chunk.content.to_lowercase();

        let mut score = 0;
        for term in &terms {
            if name.contains(*term) {
                score += NAME_MATCH_WEIGHT;
            }
            if content.contains(*term) {
                score += CONTENT_MATCH_WEIGHT;
            }
        }

        if score > 0 {
            scored.push((chunk.entity_id.clone(), score));
        }
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(top_k);

    debug!(
        "Recommended {} of {} candidates for query of {} terms",
        scored.len(),
        chunks.len(),
        terms.len()
    );

    scored.into_iter().map(|(entity_id, _)| entity_id).collect()
}
