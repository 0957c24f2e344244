use crate::core::io::traits::{MotifPage, MotifSource, SourceError};
use crate::core::models::motif::{Motif, MotifError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMotifFile {
    #[serde(default)]
    motifs: Vec<Motif>,
}

/// An in-memory collection of motifs, served in fixed-size pages ordered by motif id.
#[derive(Debug, Clone)]
pub struct MotifLibrary {
    motifs: Vec<Motif>,
    page_size: usize,
}

/// Represents errors that can occur while loading a motif library.
#[derive(Debug, Error)]
pub enum LibraryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid motif definition: {0}")]
    InvalidMotif(#[from] MotifError),
    #[error("Duplicate motif identifier '{0}'")]
    DuplicateMotif(String),
    #[error("Page size must be at least 1")]
    InvalidPageSize,
}

impl MotifLibrary {
    /// Loads a motif library from a TOML file containing a `[[motifs]]` array.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, if any motif is invalid, or if two
    /// motifs share an identifier.
    pub fn load(path: impl AsRef<Path>, page_size: usize) -> Result<Self, LibraryLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LibraryLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let raw: RawMotifFile = toml::from_str(&content).map_err(|e| LibraryLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        debug!(path = %path.display(), count = raw.motifs.len(), "Loaded motif library file.");
        Self::from_motifs(raw.motifs, page_size)
    }

    pub fn from_motifs(mut motifs: Vec<Motif>, page_size: usize) -> Result<Self, LibraryLoadError> {
        if page_size == 0 {
            return Err(LibraryLoadError::InvalidPageSize);
        }
        let mut seen = HashSet::new();
        for motif in &motifs {
            motif.validate()?;
            if !seen.insert(motif.id.clone()) {
                return Err(LibraryLoadError::DuplicateMotif(motif.id.clone()));
            }
        }
        motifs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { motifs, page_size })
    }

    pub fn motifs(&self) -> &[Motif] {
        &self.motifs
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    pub fn filtered<'a>(&'a self, ec_filter: Option<&'a str>) -> impl Iterator<Item = &'a Motif> {
        self.motifs
            .iter()
            .filter(move |m| ec_filter.is_none_or(|f| ec_matches(f, &m.ec_number)))
    }
}

impl MotifSource for MotifLibrary {
    fn page(&self, ec_filter: Option<&str>, page: usize) -> Result<MotifPage, SourceError> {
        let matching: Vec<&Motif> = self.filtered(ec_filter).collect();
        let motifs = matching
            .iter()
            .skip(page.saturating_mul(self.page_size))
            .take(self.page_size)
            .map(|m| (*m).clone())
            .collect();
        Ok(MotifPage {
            motifs,
            page,
            total: matching.len(),
        })
    }
}

/// Segment-wise prefix match of classification codes.
///
/// `"3.4"` matches `"3.4.21.4"` but not `"3.40.1.1"`; `-` and `*` segments in the filter
/// are wildcards. An empty filter matches everything.
pub fn ec_matches(filter: &str, ec_number: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    let mut code = ec_number.trim().split('.');
    filter.split('.').all(|wanted| match code.next() {
        Some(actual) => wanted == "-" || wanted == "*" || wanted == actual,
        None => wanted == "-" || wanted == "*",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::motif::Residue;
    use crate::core::models::residue::ResidueType;
    use std::fs;
    use tempfile::tempdir;

    fn motif(id: &str, ec: &str) -> Motif {
        Motif {
            id: id.to_string(),
            ec_number: ec.to_string(),
            source_structure: id.to_string(),
            active_site: vec![Residue::new(ResidueType::Cysteine, "25")],
            constraints: vec![],
        }
    }

    #[test]
    fn ec_filter_matches_whole_segments() {
        assert!(ec_matches("3.4", "3.4.21.4"));
        assert!(ec_matches("3.4.21.4", "3.4.21.4"));
        assert!(!ec_matches("3.4", "3.40.1.1"));
        assert!(!ec_matches("3.4.21.4", "3.4.21"));
        assert!(ec_matches("3.-.21", "3.4.21.4"));
        assert!(ec_matches("", "1.1.1.1"));
    }

    #[test]
    fn pages_are_ordered_by_id_and_sized() {
        let library = MotifLibrary::from_motifs(
            vec![
                motif("3CCC", "3.4.21.4"),
                motif("1AAA", "3.4.21.4"),
                motif("2BBB", "3.4.22.1"),
            ],
            2,
        )
        .unwrap();

        let first = library.page(None, 0).unwrap();
        let ids: Vec<_> = first.motifs.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1AAA", "2BBB"]);
        assert_eq!(first.total, 3);

        let second = library.page(None, 1).unwrap();
        assert_eq!(second.motifs.len(), 1);
        assert_eq!(second.motifs[0].id, "3CCC");

        assert!(!library.page(None, 2).unwrap().has_content());
    }

    #[test]
    fn pages_respect_ec_filter() {
        let library = MotifLibrary::from_motifs(
            vec![motif("1AAA", "3.4.21.4"), motif("2BBB", "3.4.22.1")],
            10,
        )
        .unwrap();
        let page = library.page(Some("3.4.22"), 0).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.motifs[0].id, "2BBB");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result =
            MotifLibrary::from_motifs(vec![motif("1AAA", "1"), motif("1AAA", "2")], 5);
        assert!(matches!(result, Err(LibraryLoadError::DuplicateMotif(id)) if id == "1AAA"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            MotifLibrary::from_motifs(vec![], 0),
            Err(LibraryLoadError::InvalidPageSize)
        ));
    }

    #[test]
    fn load_succeeds_with_valid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("motifs.toml");
        fs::write(
            &path,
            r#"
            [[motifs]]
            id = "1PPN"
            ec-number = "3.4.22.2"
            source-structure = "1PPN"
            active-site = [
                { type = "CYS", id = "25" },
                { type = "HIS", id = "159" },
                { type = "ASN", id = "175" },
            ]

            [[motifs.constraints]]
            residues = [0, 1]
            atoms = ["SG", "ND1"]
            residue-types = ["CYS", "HIS"]
            distance = 3.7
            "#,
        )
        .unwrap();

        let library = MotifLibrary::load(&path, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.motifs()[0].sequence(), "CHN");
        assert_eq!(library.motifs()[0].constraints.len(), 1);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = MotifLibrary::load(dir.path().join("missing.toml"), 5);
        assert!(matches!(result, Err(LibraryLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "this is not toml").unwrap();
        assert!(matches!(
            MotifLibrary::load(&path, 5),
            Err(LibraryLoadError::Toml { .. })
        ));
    }

    #[test]
    fn load_fails_for_invalid_motif() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        fs::write(
            &path,
            r#"
            [[motifs]]
            id = "1BAD"
            ec-number = "1.1.1.1"
            source-structure = "1BAD"
            active-site = [{ type = "SER", id = "1" }]

            [[motifs.constraints]]
            residues = [0, 4]
            atoms = ["OG", "OG"]
            residue-types = ["SER", "SER"]
            distance = 3.0
            "#,
        )
        .unwrap();
        assert!(matches!(
            MotifLibrary::load(&path, 5),
            Err(LibraryLoadError::InvalidMotif(_))
        ));
    }
}
