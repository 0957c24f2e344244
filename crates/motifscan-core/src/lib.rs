//! # motifscan Core Library
//!
//! Geometric active-site matching: a small reference motif (a handful of catalytic residues
//! and their pairwise distances) is searched for in arbitrary protein structures, and every
//! geometric match is scored by rigid-body superposition.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Motif`,
//!   `Alignment`), geometry and sequence utilities, the collaborator traits through which
//!   structures and motifs are acquired, and a TOML-backed motif library.
//!
//! - **[`engine`]: The Logic Core.** The matching pipeline proper: candidate search,
//!   pruned enumeration of residue assignments, admissibility filtering, superposition
//!   scoring, and the memo store that remembers per-pair outcomes.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the single
//!   pair pipeline ([`workflows::align`]) and the batch scan over many motifs and structures
//!   ([`workflows::scan`]).

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod fixtures;
