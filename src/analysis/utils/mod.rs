//! Utility modules for analysis normalization.

pub mod classify;
pub mod lookup_tables;

pub use classify::*;
pub use lookup_tables::*;
