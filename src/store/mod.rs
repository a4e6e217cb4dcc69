// Retrieval store module
// Per-kind entity indexes, their persisted metadata mirror, and the facade
// exposed to request-handling collaborators


pub mod models;

mod index;
mod persistence;

use std::fs;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::recommend;
use crate::scoring::{ScoringEngine, SemanticAssist};
use crate::store::index::EntityIndex;
use crate::store::models::{EntityKind, NewEntity, ScoredResult, StoreStats};
use crate::{IndexError, Result};

/// The multi-entity retrieval index. One instance is constructed at process
/// startup and shared by reference with request handlers; all operations
/// take `&self` and are safe under concurrent readers and writers.
pub struct RetrievalStore {
    documents: EntityIndex,
    knowledge_base: EntityIndex,
    automations: EntityIndex,
    dashboards: EntityIndex,
    scoring: ScoringEngine,
}

impl RetrievalStore {
    /// Open the store, creating the storage root and loading (or creating)
    /// the persisted metadata file for every entity kind. Construction is
    /// the only initialization point; operations afterwards assume
    /// readiness.
    #[inline]
    pub fn open(config: &Config) -> Result<Self> {
        let index_dir = config.index_dir_path();
        fs::create_dir_all(&index_dir).map_err(|e| {
            IndexError::Initialization(format!(
                "cannot create index directory {}: {}",
                index_dir.display(),
                e
            ))
        })?;

        let store = Self {
            documents: EntityIndex::open(EntityKind::Document, &index_dir, config.chunking.clone())?,
            knowledge_base: EntityIndex::open(
                EntityKind::KnowledgeBase,
                &index_dir,
                config.chunking.clone(),
            )?,
            automations: EntityIndex::open(
                EntityKind::Automation,
                &index_dir,
                config.chunking.clone(),
            )?,
            dashboards: EntityIndex::open(
                EntityKind::Dashboard,
                &index_dir,
                config.chunking.clone(),
            )?,
            scoring: ScoringEngine::new(None),
        };

        info!("Retrieval store opened at {}", index_dir.display());

        Ok(store)
    }

    /// Attach the optional semantic-assist collaborator. When it reports
    /// itself available, searches use enhanced scoring.
    #[inline]
    #[must_use]
    pub fn with_semantic_assist(mut self, assist: Arc<dyn SemanticAssist>) -> Self {
        self.scoring = ScoringEngine::new(Some(assist));
        self
    }

    pub(crate) fn index(&self, kind: EntityKind) -> &EntityIndex {
        match kind {
            EntityKind::Document => &self.documents,
            EntityKind::KnowledgeBase => &self.knowledge_base,
            EntityKind::Automation => &self.automations,
            EntityKind::Dashboard => &self.dashboards,
        }
    }

    /// Index a document. Returns the vector id (the document id itself).
    #[inline]
    pub async fn add_document(&self, document_id: &str, title: &str, content: &str) -> Result<String> {
        self.documents
            .add(&NewEntity {
                id: document_id.to_string(),
                display_name: title.to_string(),
                content: content.to_string(),
                category: None,
            })
            .await
    }

    /// Index a knowledge base entry
    #[inline]
    pub async fn add_knowledge_base_entry(
        &self,
        kb_id: &str,
        title: &str,
        content: &str,
        category: Option<&str>,
    ) -> Result<String> {
        self.knowledge_base
            .add(&NewEntity {
                id: kb_id.to_string(),
                display_name: title.to_string(),
                content: content.to_string(),
                category: category.map(str::to_string),
            })
            .await
    }

    /// Index an automation description as a single chunk
    #[inline]
    pub async fn add_automation(
        &self,
        automation_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String> {
        self.automations
            .add(&NewEntity {
                id: automation_id.to_string(),
                display_name: name.to_string(),
                content: description.to_string(),
                category: None,
            })
            .await
    }

    /// Index a dashboard description as a single chunk
    #[inline]
    pub async fn add_dashboard(
        &self,
        dashboard_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String> {
        self.dashboards
            .add(&NewEntity {
                id: dashboard_id.to_string(),
                display_name: name.to_string(),
                content: description.to_string(),
                category: None,
            })
            .await
    }

    /// Remove a document and all its chunks; unknown ids are a no-op
    #[inline]
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        self.documents.delete(document_id).await
    }

    /// Remove a knowledge base entry and all its chunks; unknown ids are a
    /// no-op
    #[inline]
    pub async fn delete_knowledge_base_entry(&self, kb_id: &str) -> Result<()> {
        self.knowledge_base.delete(kb_id).await
    }

    /// Rank document chunks against a query
    #[inline]
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<ScoredResult> {
        let chunks = self.documents.all_chunks().await;
        self.scoring.score(query, &chunks, top_k)
    }

    /// Rank knowledge base chunks against a query
    #[inline]
    pub async fn search_knowledge_base(&self, query: &str, top_k: usize) -> Vec<ScoredResult> {
        let chunks = self.knowledge_base.all_chunks().await;
        self.scoring.score(query, &chunks, top_k)
    }

    /// Automations related to the given free text, best match first
    #[inline]
    pub async fn recommend_automations(&self, text: &str, top_k: usize) -> Vec<String> {
        let chunks = self.automations.all_chunks().await;
        recommend::rank_entities(&chunks, text, top_k)
    }

    /// Dashboards related to the given free text, best match first
    #[inline]
    pub async fn recommend_dashboards(&self, text: &str, top_k: usize) -> Vec<String> {
        let chunks = self.dashboards.all_chunks().await;
        recommend::rank_entities(&chunks, text, top_k)
    }

    /// Counts and a bounded chunk sample per kind, for operational
    /// visibility
    #[inline]
    pub async fn stats(&self, sample_size: usize) -> StoreStats {
        StoreStats {
            documents: self.documents.stats(sample_size).await,
            knowledge_base: self.knowledge_base.stats(sample_size).await,
            automations: self.automations.stats(sample_size).await,
            dashboards: self.dashboards.stats(sample_size).await,
        }
    }
}
