//! Feed-relevant changes reported by committed writes.

use uuid::Uuid;

use crate::domain::types::Privacy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PostCreated {
        post_id: Uuid,
        author_id: Uuid,
        privacy: Privacy,
    },
    /// Content changed; privacy did not.
    PostUpdated { post_id: Uuid },
    PostPrivacyChanged { post_id: Uuid, author_id: Uuid },
    PostDeleted {
        post_id: Uuid,
        author_id: Uuid,
        privacy: Privacy,
    },
    /// A like, unlike or comment changed a post's counters.
    EngagementChanged { post_id: Uuid },
}

impl EventKind {
    pub fn post_id(&self) -> Uuid {
        match *self {
            EventKind::PostCreated { post_id, .. }
            | EventKind::PostUpdated { post_id }
            | EventKind::PostPrivacyChanged { post_id, .. }
            | EventKind::PostDeleted { post_id, .. }
            | EventKind::EngagementChanged { post_id } => post_id,
        }
    }
}
