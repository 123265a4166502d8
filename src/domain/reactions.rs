//! Reaction kinds and their display vocabulary.

use crate::domain::{error::DomainError, types::Reaction};

pub struct ReactionInfo {
    pub reaction: Reaction,
    pub slug: &'static str,
    pub verb: &'static str,
}

pub const REACTIONS: [ReactionInfo; 3] = [
    ReactionInfo {
        reaction: Reaction::ThumbsUp,
        slug: "thumbs_up",
        verb: "liked",
    },
    ReactionInfo {
        reaction: Reaction::Heart,
        slug: "heart",
        verb: "loved",
    },
    ReactionInfo {
        reaction: Reaction::Clap,
        slug: "clap",
        verb: "applauded",
    },
];

pub fn info(reaction: Reaction) -> &'static ReactionInfo {
    // The table is exhaustive over `Reaction`; fall back to the first row only
    // if a variant is ever added without a row.
    REACTIONS
        .iter()
        .find(|row| row.reaction == reaction)
        .unwrap_or(&REACTIONS[0])
}

pub fn verb(reaction: Reaction) -> &'static str {
    info(reaction).verb
}

pub fn parse(slug: &str) -> Result<Reaction, DomainError> {
    let needle = slug.trim();
    REACTIONS
        .iter()
        .find(|row| row.slug.eq_ignore_ascii_case(needle))
        .map(|row| row.reaction)
        .ok_or_else(|| {
            DomainError::validation("reaction", format!("unknown reaction `{needle}`"))
        })
}
