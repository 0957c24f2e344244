use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

const STORE_FILE_NAME: &str = "outcomes.toml";

/// Per-user locations for state that outlives a single run.
#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self> {
        let data_dir = ProjectDirs::from("org", "motifscan", "motifscan")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CliError::Config("Could not determine default data directory path.".to_string())
            })?;
        debug!("Using data directory: {:?}", &data_dir);
        Ok(Self { data_dir })
    }

    #[cfg(test)]
    pub fn with_custom_path(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Where scan outcomes are remembered when no store path is configured.
    pub fn default_store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_lives_in_the_data_directory() {
        let paths = AppPaths::with_custom_path(PathBuf::from("/tmp/motifscan-data"));
        assert_eq!(
            paths.default_store_path(),
            PathBuf::from("/tmp/motifscan-data/outcomes.toml")
        );
    }
}
