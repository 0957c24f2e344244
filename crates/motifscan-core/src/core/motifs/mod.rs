//! # Motifs Module
//!
//! Storage and paged retrieval of reference active-site motifs.
//!
//! - [`library`] - A TOML-backed motif library implementing
//!   [`MotifSource`](crate::core::io::traits::MotifSource)
//!
//! ```ignore
//! use motifscan::core::motifs::library::MotifLibrary;
//!
//! let library = MotifLibrary::load("motifs.toml", 20)?;
//! let first_page = library.page(Some("3.4"), 0)?;
//! ```

pub mod library;
