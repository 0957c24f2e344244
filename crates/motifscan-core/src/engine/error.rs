use thiserror::Error;

use super::cache::StoreError;
use super::config::ConfigError;
use crate::core::io::traits::SourceError;
use crate::core::models::motif::MotifError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Match store failure: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Motif source failure on page {page}: {source}")]
    MotifSource { page: usize, source: SourceError },

    #[error("Invalid motif: {source}")]
    InvalidMotif {
        #[from]
        source: MotifError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Motif id '{id}' is shared by a custom motif and another motif")]
    DuplicateMotifId { id: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
