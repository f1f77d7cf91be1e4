//! Exporting sampled chains.

#[cfg(feature = "csv")]
pub mod csv;
