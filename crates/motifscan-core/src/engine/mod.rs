//! # Engine Module
//!
//! The active-site matching engine: everything that happens between "here is a motif and a
//! structure" and "here is the best alignment, or none".
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Precision factor, enumeration limits and record freshness
//! - **Context** ([`context`]) - Configuration, store and reporter shared by every pair
//! - **Memoization** ([`cache`]) - The per-(motif, structure) outcome store
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Tasks** ([`tasks`]) - Candidate search, enumeration, admissibility and scoring
//!
//! A single pair flows through the tasks in that order; the workflows layer drives many pairs
//! in parallel.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod tasks;
