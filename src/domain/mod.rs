//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod posts;
pub mod reactions;
pub mod types;
pub mod users;
pub mod visibility;
