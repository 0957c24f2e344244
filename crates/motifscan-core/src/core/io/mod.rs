//! Interfaces to the collaborators that supply structures and motifs to the engine.
//!
//! The engine never parses structure files itself; callers hand it implementations of
//! [`traits::StructureProvider`] and [`traits::MotifSource`].

pub mod traits;
