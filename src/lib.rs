//! Agora: a social posting service with a privacy-aware, cached news feed.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
