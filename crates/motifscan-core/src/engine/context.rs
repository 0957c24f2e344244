use super::cache::MatchStore;
use super::config::MatchConfig;
use super::progress::ProgressReporter;
use chrono::NaiveDate;

/// Shared, read-only state for evaluating (motif, structure) pairs.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub config: &'a MatchConfig,
    pub store: &'a dyn MatchStore,
    pub reporter: &'a ProgressReporter<'a>,
    /// The date stamped on new records and used to judge the age of old ones.
    pub today: NaiveDate,
}

impl<'a> MatchContext<'a> {
    pub fn new(
        config: &'a MatchConfig,
        store: &'a dyn MatchStore,
        reporter: &'a ProgressReporter<'a>,
        today: NaiveDate,
    ) -> Self {
        Self {
            config,
            store,
            reporter,
            today,
        }
    }

    pub fn precision_factor(&self) -> f64 {
        self.config.precision_factor
    }
}
