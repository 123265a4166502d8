//! Shared domain enumerations aligned with persisted database enums.
//!
//! The wire and column representations live in `agora-api-types`; the domain
//! re-exports them so services and adapters agree on a single definition.

pub use agora_api_types::{PostKind, Privacy, Reaction, Role};
