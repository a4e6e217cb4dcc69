use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The entity kinds the store indexes, each with its own in-memory table
/// and persisted metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Document,
    KnowledgeBase,
    Automation,
    Dashboard,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Document,
        EntityKind::KnowledgeBase,
        EntityKind::Automation,
        EntityKind::Dashboard,
    ];

    /// Persisted metadata file for this kind
    #[inline]
    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::Document => "documents_info.json",
            EntityKind::KnowledgeBase => "knowledge_base_info.json",
            EntityKind::Automation => "automations_info.json",
            EntityKind::Dashboard => "dashboards_info.json",
        }
    }

    /// Key under which the entity id appears in result metadata
    #[inline]
    pub fn id_key(self) -> &'static str {
        match self {
            EntityKind::Document => "document_id",
            EntityKind::KnowledgeBase => "kb_id",
            EntityKind::Automation => "automation_id",
            EntityKind::Dashboard => "dashboard_id",
        }
    }

    /// Key under which the display name appears in result metadata
    #[inline]
    pub fn label_key(self) -> &'static str {
        match self {
            EntityKind::Document | EntityKind::KnowledgeBase => "title",
            EntityKind::Automation | EntityKind::Dashboard => "name",
        }
    }

    /// Whether content is split into multiple chunks. Automations and
    /// dashboards store their whole description as one chunk whose id is
    /// the entity id.
    #[inline]
    pub fn is_chunked(self) -> bool {
        matches!(self, EntityKind::Document | EntityKind::KnowledgeBase)
    }
}

impl std::fmt::Display for EntityKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            EntityKind::Document => write!(f, "document"),
            EntityKind::KnowledgeBase => write!(f, "knowledge base"),
            EntityKind::Automation => write!(f, "automation"),
            EntityKind::Dashboard => write!(f, "dashboard"),
        }
    }
}

/// A bounded segment of an entity's content, independently scorable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_id: String,
    pub entity_id: String,
    pub kind: EntityKind,
    pub content: String,
    pub ordinal: usize,
    pub extra_metadata: BTreeMap<String, String>,
}

impl Chunk {
    /// Metadata map attached to search results for this chunk
    #[inline]
    pub fn result_metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.extra_metadata.clone();
        metadata.insert(self.kind.id_key().to_string(), self.entity_id.clone());
        if self.kind.is_chunked() {
            metadata.insert("chunk".to_string(), self.ordinal.to_string());
        }
        metadata
    }

    /// First 100 characters of content, for debug samples
    #[inline]
    pub fn content_preview(&self) -> String {
        let mut preview: String = self.content.chars().take(100).collect();
        if self.content.chars().count() > 100 {
            preview.push_str("...");
        }
        preview
    }
}

/// The per-entity record persisted to disk. Chunk content is never
/// persisted; it is re-derived from the system of record at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityMetadata {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub chunk_ids: Vec<String>,
    pub chunk_count: usize,
}

/// Input record for adding an entity to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    pub id: String,
    pub display_name: String,
    pub content: String,
    pub category: Option<String>,
}

/// A chunk ranked against a query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub content: String,
    pub metadata: BTreeMap<String, String>,
    pub relevance_score: f64,
}

/// Operational snapshot of all four indexes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub documents: KindStats,
    pub knowledge_base: KindStats,
    pub automations: KindStats,
    pub dashboards: KindStats,
}

/// Counts plus a bounded sample of stored chunks for one entity kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindStats {
    pub entity_count: usize,
    pub chunk_count: usize,
    pub entities: BTreeMap<String, EntityMetadata>,
    pub sample_chunks: Vec<ChunkSample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSample {
    pub chunk_id: String,
    pub content_preview: String,
    pub metadata: BTreeMap<String, String>,
}
