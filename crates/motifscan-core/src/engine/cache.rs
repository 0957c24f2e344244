//! Memoization of per-(motif, structure) outcomes.
//!
//! A [`MatchRecord`] remembers whether a motif matched a structure, under which precision
//! factor, on which day, and (for positive outcomes) the full [`Alignment`]. The engine
//! consults the store before doing any geometric work and writes back every definitive
//! outcome.

use crate::core::models::alignment::Alignment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchRecord {
    pub matched: bool,
    pub recorded_on: NaiveDate,
    pub precision_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl MatchRecord {
    pub fn matched(alignment: Alignment, precision_factor: f64, recorded_on: NaiveDate) -> Self {
        Self {
            matched: true,
            recorded_on,
            precision_factor,
            alignment: Some(alignment),
        }
    }

    pub fn unmatched(precision_factor: f64, recorded_on: NaiveDate) -> Self {
        Self {
            matched: false,
            recorded_on,
            precision_factor,
            alignment: None,
        }
    }

    /// Whether this record may stand in for a fresh evaluation.
    ///
    /// A record is reusable only under the same precision factor, only while younger than
    /// `ttl_days` (when set), and, if positive, only when it carries its alignment.
    pub fn is_fresh(&self, precision_factor: f64, ttl_days: Option<u32>, today: NaiveDate) -> bool {
        if self.precision_factor != precision_factor {
            return false;
        }
        if self.matched && self.alignment.is_none() {
            return false;
        }
        match ttl_days {
            Some(ttl) => (today - self.recorded_on).num_days() < i64::from(ttl),
            None => true,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Match store is unavailable: {0}")]
    Unavailable(String),
    #[error("Match store lock was poisoned")]
    Poisoned,
}

/// Persistent memory of (motif, structure) outcomes.
///
/// Implementations must tolerate concurrent calls from worker threads. Recording the same
/// outcome twice only refreshes its date.
pub trait MatchStore: Sync {
    fn lookup(&self, motif_id: &str, structure_id: &str) -> Result<Option<MatchRecord>, StoreError>;

    fn record(
        &self,
        motif_id: &str,
        structure_id: &str,
        record: MatchRecord,
    ) -> Result<(), StoreError>;
}

/// A record together with the pair it belongs to, as exported by [`InMemoryMatchStore::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoredRecord {
    pub motif_id: String,
    pub structure_id: String,
    pub record: MatchRecord,
}

#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    records: RwLock<HashMap<(String, String), MatchRecord>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| ((r.motif_id, r.structure_id), r.record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Exports every record, ordered by motif id then structure id.
    pub fn snapshot(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut records: Vec<StoredRecord> = guard
            .iter()
            .map(|((motif_id, structure_id), record)| StoredRecord {
                motif_id: motif_id.clone(),
                structure_id: structure_id.clone(),
                record: record.clone(),
            })
            .collect();
        records.sort_by(|a, b| {
            (a.motif_id.as_str(), a.structure_id.as_str())
                .cmp(&(b.motif_id.as_str(), b.structure_id.as_str()))
        });
        Ok(records)
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchStore for InMemoryMatchStore {
    fn lookup(&self, motif_id: &str, structure_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let guard = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard
            .get(&(motif_id.to_string(), structure_id.to_string()))
            .cloned())
    }

    fn record(
        &self,
        motif_id: &str,
        structure_id: &str,
        record: MatchRecord,
    ) -> Result<(), StoreError> {
        let mut guard = self.records.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert((motif_id.to_string(), structure_id.to_string()), record);
        Ok(())
    }
}
