use thiserror::Error;

use crate::store::models::EntityKind;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("Persistence error: failed to {operation} {kind} entity '{entity_id}': {message}")]
    Persistence {
        kind: EntityKind,
        entity_id: String,
        operation: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod bootstrap;
pub mod chunking;
pub mod commands;
pub mod config;
pub mod recommend;
pub mod scoring;
pub mod store;
