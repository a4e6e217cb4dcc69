// Bootstrap module
// Startup reconciliation between the in-memory indexes and the
// authoritative system of record


use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::Result;
use crate::store::RetrievalStore;
use crate::store::models::{EntityKind, NewEntity};

/// An entity as enumerated by the system of record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: String,
    pub display_name: String,
    pub content: String,
    pub category: Option<String>,
}

/// Accessor for one entity kind in the authoritative external store.
/// Implemented by collaborators (database repositories, REST clients);
/// the loader only ever enumerates.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<EntityRecord>>;
}

/// Per-kind outcome counts from a bootstrap pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindReport {
    /// Entities not present in persisted metadata, indexed for the first
    /// time
    pub added: usize,
    /// Entities already known, whose chunks were rebuilt in memory
    pub rehydrated: usize,
    /// Rehydrated entities whose content no longer matched the persisted
    /// entry
    pub drifted: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub documents: KindReport,
    pub knowledge_base: KindReport,
    pub automations: KindReport,
    pub dashboards: KindReport,
}

impl BootstrapReport {
    fn entry(&mut self, kind: EntityKind) -> &mut KindReport {
        match kind {
            EntityKind::Document => &mut self.documents,
            EntityKind::KnowledgeBase => &mut self.knowledge_base,
            EntityKind::Automation => &mut self.automations,
            EntityKind::Dashboard => &mut self.dashboards,
        }
    }

    #[inline]
    pub fn total_added(&self) -> usize {
        self.documents.added
            + self.knowledge_base.added
            + self.automations.added
            + self.dashboards.added
    }

    #[inline]
    pub fn total_rehydrated(&self) -> usize {
        self.documents.rehydrated
            + self.knowledge_base.rehydrated
            + self.automations.rehydrated
            + self.dashboards.rehydrated
    }
}

/// Repopulates the store from the system of record at process start.
///
/// Entities missing from persisted metadata are indexed; entities already
/// known get their chunk content re-derived into memory, since content is
/// never persisted. Running the loader twice leaves the store unchanged.
#[derive(Default)]
pub struct BootstrapLoader {
    documents: Option<Box<dyn RecordSource>>,
    knowledge_base: Option<Box<dyn RecordSource>>,
    automations: Option<Box<dyn RecordSource>>,
    dashboards: Option<Box<dyn RecordSource>>,
}

impl BootstrapLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_source(mut self, kind: EntityKind, source: Box<dyn RecordSource>) -> Self {
        match kind {
            EntityKind::Document => self.documents = Some(source),
            EntityKind::KnowledgeBase => self.knowledge_base = Some(source),
            EntityKind::Automation => self.automations = Some(source),
            EntityKind::Dashboard => self.dashboards = Some(source),
        }
        self
    }

    fn source(&self, kind: EntityKind) -> Option<&dyn RecordSource> {
        match kind {
            EntityKind::Document => self.documents.as_deref(),
            EntityKind::KnowledgeBase => self.knowledge_base.as_deref(),
            EntityKind::Automation => self.automations.as_deref(),
            EntityKind::Dashboard => self.dashboards.as_deref(),
        }
    }

    /// Reconcile every configured kind. Add-only: entities present in
    /// persisted metadata but absent from the system of record are left
    /// alone.
    #[inline]
    pub async fn run(&self, store: &RetrievalStore) -> Result<BootstrapReport> {
        let mut report = BootstrapReport::default();

        for kind in EntityKind::ALL {
            let Some(source) = self.source(kind) else {
                debug!("No {} source configured, skipping", kind);
                continue;
            };

            let records = source
                .list_all()
                .await
                .with_context(|| format!("Failed to enumerate {} records", kind))?;

            info!(
                "Reconciling {} {} records from the system of record",
                records.len(),
                kind
            );

            let index = store.index(kind);
            let counts = report.entry(kind);

            for record in records {
                let entity = NewEntity {
                    id: record.id,
                    display_name: record.display_name,
                    content: record.content,
                    category: record.category,
                };

                if index.contains(&entity.id).await {
                    let drifted = index.rehydrate(&entity).await?;
                    counts.rehydrated += 1;
                    if drifted {
                        counts.drifted += 1;
                    }
                } else {
                    index.add(&entity).await?;
                    counts.added += 1;
                }
            }
        }

        info!(
            "Bootstrap complete: {} added, {} rehydrated",
            report.total_added(),
            report.total_rehydrated()
        );

        Ok(report)
    }
}
