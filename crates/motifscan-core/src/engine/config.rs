use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_ASSIGNMENTS: usize = 100_000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Parameters of a single (motif, structure) evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Multiplier applied to every expected distance and to the error margin.
    pub precision_factor: f64,
    /// Upper bound on the unpruned number of residue assignments for one pair.
    pub max_assignments: usize,
    /// Reject partial assignments whose already-placed residues violate a constraint.
    pub pairwise_pruning: bool,
    /// Wall-clock budget for enumerating and scoring the assignments of one pair.
    pub pair_deadline: Option<Duration>,
    /// Age after which memoized outcomes are recomputed.
    pub record_ttl_days: Option<u32>,
}

#[derive(Default)]
pub struct MatchConfigBuilder {
    precision_factor: Option<f64>,
    max_assignments: Option<usize>,
    pairwise_pruning: Option<bool>,
    pair_deadline: Option<Duration>,
    record_ttl_days: Option<u32>,
}

impl MatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn precision_factor(mut self, factor: f64) -> Self {
        self.precision_factor = Some(factor);
        self
    }
    pub fn max_assignments(mut self, limit: usize) -> Self {
        self.max_assignments = Some(limit);
        self
    }
    pub fn pairwise_pruning(mut self, enabled: bool) -> Self {
        self.pairwise_pruning = Some(enabled);
        self
    }
    pub fn pair_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.pair_deadline = deadline;
        self
    }
    pub fn record_ttl_days(mut self, days: Option<u32>) -> Self {
        self.record_ttl_days = days;
        self
    }

    pub fn build(self) -> Result<MatchConfig, ConfigError> {
        let precision_factor = self
            .precision_factor
            .ok_or(ConfigError::MissingParameter("precision_factor"))?;
        if !precision_factor.is_finite() || precision_factor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "precision_factor",
                reason: format!("must be a positive number, got {precision_factor}"),
            });
        }

        let max_assignments = self.max_assignments.unwrap_or(DEFAULT_MAX_ASSIGNMENTS);
        if max_assignments == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "max_assignments",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.pair_deadline.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::InvalidValue {
                parameter: "pair_deadline",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(MatchConfig {
            precision_factor,
            max_assignments,
            pairwise_pruning: self.pairwise_pruning.unwrap_or(true),
            pair_deadline: self.pair_deadline,
            record_ttl_days: self.record_ttl_days,
        })
    }
}
