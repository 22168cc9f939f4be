//! Domain entities: starters, feedings, photo analyses and chat messages.

pub mod entities;
pub mod ids;

pub use entities::*;
pub use ids::generate_id;
