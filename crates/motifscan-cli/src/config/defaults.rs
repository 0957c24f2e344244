use motifscan::core::motifs::library::DEFAULT_PAGE_SIZE;
use motifscan::engine::config::DEFAULT_MAX_ASSIGNMENTS;

pub struct DefaultsConfig {
    pub precision_factor: f64,
    pub max_assignments: usize,
    pub pairwise_pruning: bool,
    pub page_size: usize,
    pub use_store: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            precision_factor: 1.0,
            max_assignments: DEFAULT_MAX_ASSIGNMENTS,
            pairwise_pruning: true,
            page_size: DEFAULT_PAGE_SIZE,
            use_store: true,
        }
    }
}
