use crate::error::{CliError, Result};
use motifscan::engine::cache::{InMemoryMatchStore, StoreError, StoredRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreFile {
    #[serde(default)]
    records: Vec<StoredRecord>,
}

/// Loads the outcome store from `path`, starting empty if the file does not exist yet.
pub fn load(path: &Path) -> Result<InMemoryMatchStore> {
    if !path.exists() {
        debug!("No outcome store at {:?}; starting empty.", path);
        return Ok(InMemoryMatchStore::new());
    }
    let content = std::fs::read_to_string(path)?;
    let file: StoreFile = toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!(records = file.records.len(), "Loaded outcome store from {:?}.", path);
    Ok(InMemoryMatchStore::from_records(file.records))
}

/// Writes every record of `store` to `path`, creating parent directories as needed.
pub fn save(store: &InMemoryMatchStore, path: &Path) -> Result<()> {
    let records = store.snapshot().map_err(store_error)?;
    let count = records.len();
    let content = toml::to_string(&StoreFile { records })
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize outcome store: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    info!(records = count, "Saved outcome store to {:?}.", path);
    Ok(())
}

fn store_error(e: StoreError) -> CliError {
    CliError::Other(anyhow::anyhow!("Outcome store error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use motifscan::core::models::alignment::Alignment;
    use motifscan::core::models::motif::Residue;
    use motifscan::core::models::residue::ResidueType;
    use motifscan::engine::cache::{MatchRecord, MatchStore};
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn alignment() -> Alignment {
        Alignment {
            motif_id: "1TRI".to_string(),
            active_site_residues: vec![Residue::new(ResidueType::Histidine, "57")],
            aligned_residues: vec![Residue::new(ResidueType::Histidine, "40")],
            min_distance: 0,
            max_distance: 0,
            rmsd: 0.25,
            ec_number: "3.4.21.4".to_string(),
        }
    }

    #[test]
    fn missing_file_loads_as_empty_store() {
        let dir = tempdir().unwrap();
        let store = load(&dir.path().join("absent.toml")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn saved_store_reloads_with_the_same_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("outcomes.toml");

        let store = InMemoryMatchStore::new();
        store
            .record("1TRI", "2XYZ", MatchRecord::matched(alignment(), 1.0, day()))
            .unwrap();
        store
            .record("1TRI", "4GLY", MatchRecord::unmatched(1.0, day()))
            .unwrap();
        save(&store, &path).unwrap();

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.lookup("1TRI", "2XYZ").unwrap(),
            Some(MatchRecord::matched(alignment(), 1.0, day()))
        );
        assert_eq!(
            reloaded.lookup("1TRI", "4GLY").unwrap(),
            Some(MatchRecord::unmatched(1.0, day()))
        );
    }

    #[test]
    fn corrupt_store_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("outcomes.toml");
        std::fs::write(&path, "records = 5").unwrap();
        assert!(matches!(load(&path), Err(CliError::FileParsing { .. })));
    }
}
