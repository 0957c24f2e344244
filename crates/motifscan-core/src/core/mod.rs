//! # Core Module
//!
//! Data models and utilities shared by the matching engine and its callers.
//!
//! - **Models** ([`models`]) - Structures, residues, atoms, motifs and alignments
//! - **Utilities** ([`utils`]) - Rigid-body superposition and sequence edit distance
//! - **Collaborators** ([`io`]) - Traits for acquiring structures and paging motifs
//! - **Motif Storage** ([`motifs`]) - A TOML-backed motif library
//!
//! Nothing in this module parses raw structure formats; structures reach the engine already
//! assembled by a [`StructureProvider`](io::traits::StructureProvider).

pub mod io;
pub mod models;
pub mod motifs;
pub mod utils;
