//! The computational steps of matching one motif against one structure.
//!
//! Each submodule is one stage of the pipeline, run in this order: geometric candidate
//! search, enumeration of residue assignments, sequence admissibility, and superposition
//! scoring.

pub mod admissibility;
pub mod candidate_search;
pub mod permutations;
pub mod superposition;
