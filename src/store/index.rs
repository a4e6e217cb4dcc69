use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::chunking::{SplitterConfig, split_text};
use crate::store::models::{Chunk, ChunkSample, EntityKind, EntityMetadata, KindStats, NewEntity};
use crate::store::persistence::JsonStore;
use crate::{IndexError, Result};

/// In-memory index for one entity kind, mirrored to a persisted metadata
/// file. One write lock guards both the chunk table and the file, so
/// readers never observe a half-applied mutation.
#[derive(Debug)]
pub(crate) struct EntityIndex {
    kind: EntityKind,
    splitter: SplitterConfig,
    persistence: JsonStore,
    state: RwLock<IndexState>,
}

#[derive(Debug, Default)]
struct IndexState {
    /// Chunks in insertion order; scoring relies on this for stable
    /// tie-breaks.
    chunks: Vec<Chunk>,
    metadata: BTreeMap<String, EntityMetadata>,
}

impl EntityIndex {
    /// Open the index, loading persisted metadata (or creating an empty
    /// file). Chunk content starts empty; bootstrap rehydrates it from the
    /// system of record.
    pub fn open(kind: EntityKind, index_dir: &Path, splitter: SplitterConfig) -> Result<Self> {
        let persistence = JsonStore::new(kind, index_dir);
        let metadata = persistence.load()?;

        Ok(Self {
            kind,
            splitter,
            persistence,
            state: RwLock::new(IndexState {
                chunks: Vec::new(),
                metadata,
            }),
        })
    }

    fn derive_chunks(&self, entity: &NewEntity) -> Vec<Chunk> {
        let mut extra_metadata = BTreeMap::new();
        extra_metadata.insert(
            self.kind.label_key().to_string(),
            entity.display_name.clone(),
        );
        if let Some(category) = &entity.category {
            extra_metadata.insert("category".to_string(), category.clone());
        }

        if self.kind.is_chunked() {
            split_text(&entity.content, &self.splitter)
                .into_iter()
                .enumerate()
                .map(|(ordinal, content)| Chunk {
                    chunk_id: format!("{}_{}", entity.id, ordinal),
                    entity_id: entity.id.clone(),
                    kind: self.kind,
                    content,
                    ordinal,
                    extra_metadata: extra_metadata.clone(),
                })
                .collect()
        } else {
            vec![Chunk {
                chunk_id: entity.id.clone(),
                entity_id: entity.id.clone(),
                kind: self.kind,
                content: entity.content.clone(),
                ordinal: 0,
                extra_metadata,
            }]
        }
    }

    fn metadata_for(&self, entity: &NewEntity, chunks: &[Chunk]) -> EntityMetadata {
        EntityMetadata {
            display_name: entity.display_name.clone(),
            category: entity.category.clone(),
            chunk_ids: chunks.iter().map(|c| c.chunk_id.clone()).collect(),
            chunk_count: chunks.len(),
        }
    }

    /// Index an entity, fully replacing any prior chunks for its id. The
    /// metadata file is written before memory is updated; a failed write
    /// leaves the index exactly as it was.
    pub async fn add(&self, entity: &NewEntity) -> Result<String> {
        let new_chunks = self.derive_chunks(entity);
        let entry = self.metadata_for(entity, &new_chunks);

        let mut state = self.state.write().await;

        let mut metadata = state.metadata.clone();
        metadata.insert(entity.id.clone(), entry);

        self.persistence
            .save(&metadata)
            .map_err(|e| IndexError::Persistence {
                kind: self.kind,
                entity_id: entity.id.clone(),
                operation: "save",
                message: e.to_string(),
            })?;

        state.chunks.retain(|c| c.entity_id != entity.id);
        let chunk_count = new_chunks.len();
        state.chunks.extend(new_chunks);
        state.metadata = metadata;

        info!(
            "Indexed {} '{}' as {} chunks",
            self.kind, entity.id, chunk_count
        );

        Ok(entity.id.clone())
    }

    /// Remove an entity and its chunks. Unknown ids are a no-op.
    pub async fn delete(&self, entity_id: &str) -> Result<()> {
        let mut state = self.state.write().await;

        if !state.metadata.contains_key(entity_id)
            && !state.chunks.iter().any(|c| c.entity_id == entity_id)
        {
            debug!("Delete of unknown {} '{}' ignored", self.kind, entity_id);
            return Ok(());
        }

        let mut metadata = state.metadata.clone();
        metadata.remove(entity_id);

        self.persistence
            .save(&metadata)
            .map_err(|e| IndexError::Persistence {
                kind: self.kind,
                entity_id: entity_id.to_string(),
                operation: "delete",
                message: e.to_string(),
            })?;

        let before = state.chunks.len();
        state.chunks.retain(|c| c.entity_id != entity_id);
        let removed = before - state.chunks.len();
        state.metadata = metadata;

        info!(
            "Deleted {} '{}' and {} chunks",
            self.kind, entity_id, removed
        );

        Ok(())
    }

    /// Rebuild an entity's in-memory chunks from current system-of-record
    /// content without touching other entities. Rewrites the metadata file
    /// only when the re-derived chunk set no longer matches the persisted
    /// entry (content drifted while the process was down). Returns whether
    /// the entry drifted.
    pub async fn rehydrate(&self, entity: &NewEntity) -> Result<bool> {
        let new_chunks = self.derive_chunks(entity);
        let entry = self.metadata_for(entity, &new_chunks);

        let mut state = self.state.write().await;

        let drifted = state.metadata.get(&entity.id) != Some(&entry);
        if drifted {
            let mut metadata = state.metadata.clone();
            metadata.insert(entity.id.clone(), entry);

            self.persistence
                .save(&metadata)
                .map_err(|e| IndexError::Persistence {
                    kind: self.kind,
                    entity_id: entity.id.clone(),
                    operation: "rehydrate",
                    message: e.to_string(),
                })?;

            state.metadata = metadata;
            debug!("{} '{}' drifted since last persist", self.kind, entity.id);
        }

        state.chunks.retain(|c| c.entity_id != entity.id);
        state.chunks.extend(new_chunks);

        Ok(drifted)
    }

    /// Whether persisted metadata already knows this entity
    pub async fn contains(&self, entity_id: &str) -> bool {
        self.state.read().await.metadata.contains_key(entity_id)
    }

    /// Insertion-ordered snapshot of all chunks, for scoring
    pub async fn all_chunks(&self) -> Vec<Chunk> {
        self.state.read().await.chunks.clone()
    }

    pub async fn stats(&self, sample_size: usize) -> KindStats {
        let state = self.state.read().await;

        KindStats {
            entity_count: state.metadata.len(),
            chunk_count: state.chunks.len(),
            entities: state.metadata.clone(),
            sample_chunks: state
                .chunks
                .iter()
                .take(sample_size)
                .map(|chunk| ChunkSample {
                    chunk_id: chunk.chunk_id.clone(),
                    content_preview: chunk.content_preview(),
                    metadata: chunk.result_metadata(),
                })
                .collect(),
        }
    }
}
