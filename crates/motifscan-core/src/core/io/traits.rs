use crate::core::models::motif::Motif;
use crate::core::models::structure::Structure;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Structure '{0}' could not be found")]
    NotFound(String),
    #[error("Failed to read structure '{id}': {message}")]
    Unreadable { id: String, message: String },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Motif source is unavailable: {0}")]
    Unavailable(String),
}

/// Resolves structure identifiers into in-memory structures.
pub trait StructureProvider: Sync {
    /// Fetches a single structure by identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the structure cannot be acquired.
    fn fetch(&self, id: &str) -> Result<Structure, ProviderError>;

    /// Resolves every identifier, splitting the results into acquired structures and the
    /// identifiers that could not be acquired. Duplicate identifiers are resolved once.
    fn resolve_all(&self, ids: &[String]) -> (Vec<Structure>, Vec<String>) {
        let mut found = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            match self.fetch(id) {
                Ok(structure) => found.push(structure),
                Err(e) => {
                    warn!(structure = %id, error = %e, "Structure could not be acquired.");
                    failed.push(id.clone());
                }
            }
        }
        (found, failed)
    }
}

/// One page of motifs returned by a [`MotifSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotifPage {
    pub motifs: Vec<Motif>,
    pub page: usize,
    /// Total number of motifs matching the filter, across all pages.
    pub total: usize,
}

impl MotifPage {
    pub fn has_content(&self) -> bool {
        !self.motifs.is_empty()
    }
}

/// Paged retrieval of motifs filtered by classification code.
///
/// Pages are numbered from zero. A page without content marks the end of the stream.
pub trait MotifSource: Sync {
    fn page(&self, ec_filter: Option<&str>, page: usize) -> Result<MotifPage, SourceError>;
}
