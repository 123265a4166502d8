//! Invalidation planning.
//!
//! Maps a committed change to the set of entities whose pages must be
//! dropped.

use std::collections::HashSet;
use std::fmt;

use crate::domain::types::Privacy;

use super::events::EventKind;
use super::keys::{EntityKey, FeedScope};

#[derive(Debug, Default)]
pub struct ConsumptionPlan {
    pub invalidate_entities: HashSet<EntityKey>,
}

impl fmt::Display for ConsumptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConsumptionPlan {{ invalidate: {} }}",
            self.invalidate_entities.len()
        )
    }
}

impl ConsumptionPlan {
    pub fn for_event(kind: &EventKind) -> Self {
        Self {
            invalidate_entities: entities_for(kind).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.invalidate_entities.is_empty()
    }
}

/// Entities whose cached pages an event makes stale.
///
/// A new private post only touches its author's scope: before it existed the
/// author read the public scope, whose pages never contain private posts.
pub fn entities_for(kind: &EventKind) -> Vec<EntityKey> {
    match *kind {
        EventKind::PostCreated {
            privacy: Privacy::Public,
            ..
        } => vec![EntityKey::PublicTimeline],
        EventKind::PostCreated {
            author_id,
            privacy: Privacy::Private,
            ..
        } => vec![EntityKey::Scope(FeedScope::Viewer(author_id))],
        EventKind::PostUpdated { post_id } | EventKind::EngagementChanged { post_id } => {
            vec![EntityKey::Post(post_id)]
        }
        EventKind::PostPrivacyChanged { author_id, .. } => vec![
            EntityKey::PublicTimeline,
            EntityKey::Scope(FeedScope::Viewer(author_id)),
        ],
        EventKind::PostDeleted {
            privacy: Privacy::Public,
            ..
        } => vec![EntityKey::PublicTimeline],
        EventKind::PostDeleted {
            post_id,
            author_id,
            privacy: Privacy::Private,
        } => vec![
            EntityKey::Scope(FeedScope::Viewer(author_id)),
            EntityKey::Post(post_id),
        ],
    }
}
