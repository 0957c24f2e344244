//! # Workflows Module
//!
//! The public entry points of motifscan.
//!
//! - **Pair Alignment** ([`align`]) - Matches one motif against one structure, consulting
//!   and updating the memo store.
//! - **Batch Scan** ([`scan`]) - Pages through a motif source, adds caller-supplied motifs,
//!   and matches each of them against a set of structures in parallel.

pub mod align;
pub mod scan;
