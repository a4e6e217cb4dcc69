use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::IndexError;
use crate::store::models::{EntityKind, EntityMetadata};

/// Durable JSON mirror of one entity kind's metadata map.
///
/// The file holds a single JSON object keyed by entity id. Only metadata is
/// stored here; chunk content lives in memory and is re-derived from the
/// system of record at bootstrap.
#[derive(Debug)]
pub(crate) struct JsonStore {
    kind: EntityKind,
    path: PathBuf,
}

impl JsonStore {
    pub fn new(kind: EntityKind, index_dir: &std::path::Path) -> Self {
        Self {
            kind,
            path: index_dir.join(kind.file_name()),
        }
    }

    /// Load the persisted metadata map, creating an empty file when none
    /// exists yet. A file that cannot be parsed into the expected shape is
    /// rejected rather than trusted.
    pub fn load(&self) -> crate::Result<BTreeMap<String, EntityMetadata>> {
        if !self.path.exists() {
            fs::write(&self.path, "{}").map_err(|e| {
                IndexError::Initialization(format!(
                    "cannot create {} metadata file {}: {}",
                    self.kind,
                    self.path.display(),
                    e
                ))
            })?;
            debug!("Created empty {} metadata file", self.kind);
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            IndexError::Initialization(format!(
                "cannot read {} metadata file {}: {}",
                self.kind,
                self.path.display(),
                e
            ))
        })?;

        let metadata: BTreeMap<String, EntityMetadata> =
            serde_json::from_str(&content).map_err(|e| {
                IndexError::Initialization(format!(
                    "{} metadata file {} has an invalid shape: {}",
                    self.kind,
                    self.path.display(),
                    e
                ))
            })?;

        info!(
            "Loaded {} {} entries from {}",
            metadata.len(),
            self.kind,
            self.path.display()
        );

        Ok(metadata)
    }

    /// Write the metadata map to a temporary file and rename it over the
    /// target, so a crash mid-write never leaves a partial file behind.
    pub fn save(&self, metadata: &BTreeMap<String, EntityMetadata>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(
            "Persisted {} {} entries to {}",
            metadata.len(),
            self.kind,
            self.path.display()
        );

        Ok(())
    }
}
