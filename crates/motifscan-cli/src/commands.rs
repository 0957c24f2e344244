pub mod motifs;
pub mod scan;
