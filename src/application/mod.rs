//! Application services layer.

pub mod engagement;
pub mod error;
pub mod feed;
pub mod hooks;
pub mod identity;
pub mod pagination;
pub mod posts;
pub mod repos;
