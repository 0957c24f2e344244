//! # Core Models Module
//!
//! Data structures shared by every layer of motifscan.
//!
//! ## Key Components
//!
//! - [`structure`] - Target structures: chains, residue instances ("groups") and atoms
//! - [`residue`] - Residue types and structural groups
//! - [`atom`] - Atoms and the atom filter used for superposition scoring
//! - [`motif`] - Reference active-site motifs and their distance constraints
//! - [`alignment`] - Accepted matches of a motif against a structure
//! - [`ids`] - Stable slot-map keys for atoms, groups and chains
//!
//! ## Usage
//!
//! ```ignore
//! use motifscan::core::models::{residue::ResidueType, structure::Structure};
//!
//! let mut structure = Structure::new("1ABC");
//! let chain = structure.add_chain('A');
//! let his = structure.add_group(chain, ResidueType::Histidine, "HIS", 57, None)?;
//! structure.add_atom(his, "NE2", 1, Point3::new(0.0, 0.0, 0.0));
//! ```

pub mod alignment;
pub mod atom;
pub mod chain;
pub mod ids;
pub mod motif;
pub mod residue;
pub mod structure;
