use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileMatchingConfig {
    pub precision_factor: Option<f64>,
    pub max_assignments: Option<usize>,
    pub pairwise_pruning: Option<bool>,
    pub pair_deadline_ms: Option<u64>,
    pub record_ttl_days: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLibraryConfig {
    pub path: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub ec_filter: Option<String>,
    #[serde(default)]
    pub custom_motifs: Vec<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileStoreConfig {
    pub path: Option<PathBuf>,
    pub enabled: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileStructuresConfig {
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub matching: Option<FileMatchingConfig>,
    pub library: Option<FileLibraryConfig>,
    pub store: Option<FileStoreConfig>,
    pub structures: Option<FileStructuresConfig>,
    pub output: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
