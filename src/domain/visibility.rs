//! Who may see which post.

use uuid::Uuid;

use crate::domain::entities::PostRecord;

/// The identity a read or write is performed on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User { id: Uuid },
}

impl Viewer {
    pub fn user(id: Uuid) -> Self {
        Self::User { id }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User { id } => Some(*id),
        }
    }
}

/// Public posts are visible to everyone; private posts only to their author.
///
/// Account roles do not widen visibility.
pub fn is_visible(post: &PostRecord, viewer: &Viewer) -> bool {
    post.is_public() || viewer.user_id() == Some(post.author_id)
}

/// Only the author may mutate a post.
pub fn is_owner(post: &PostRecord, viewer: &Viewer) -> bool {
    viewer.user_id() == Some(post.author_id)
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::types::{PostKind, Privacy};

    fn post(author_id: Uuid, privacy: Privacy) -> PostRecord {
        PostRecord {
            id: Uuid::new_v4(),
            author_id,
            title: "Hello World".into(),
            content: "body".into(),
            privacy,
            kind: PostKind::Text,
            media_url: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn public_posts_are_visible_to_everyone() {
        let author = Uuid::new_v4();
        let post = post(author, Privacy::Public);
        assert!(is_visible(&post, &Viewer::Anonymous));
        assert!(is_visible(&post, &Viewer::user(Uuid::new_v4())));
    }

    #[test]
    fn private_posts_are_visible_only_to_author() {
        let author = Uuid::new_v4();
        let post = post(author, Privacy::Private);
        assert!(is_visible(&post, &Viewer::user(author)));
        assert!(!is_visible(&post, &Viewer::Anonymous));
        assert!(!is_visible(&post, &Viewer::user(Uuid::new_v4())));
    }

    #[test]
    fn ownership_requires_matching_author() {
        let author = Uuid::new_v4();
        let post = post(author, Privacy::Public);
        assert!(is_owner(&post, &Viewer::user(author)));
        assert!(!is_owner(&post, &Viewer::user(Uuid::new_v4())));
        assert!(!is_owner(&post, &Viewer::Anonymous));
    }
}
