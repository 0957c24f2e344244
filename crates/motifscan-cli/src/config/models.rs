use motifscan::engine::config::MatchConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub structures_dir: PathBuf,
    /// Empty means every structure found in `structures_dir`.
    pub structure_ids: Vec<String>,
    pub library_path: PathBuf,
    pub page_size: usize,
    pub custom_motif_paths: Vec<PathBuf>,
    pub ec_filter: Option<String>,
    pub store_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub core_config: MatchConfig,
}
