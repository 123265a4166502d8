use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::entities::{FeedItem, PostRecord};
use crate::domain::types::{PostKind, Privacy};
use crate::infra::db::util::convert_count;

pub(crate) const POST_COLUMNS: &str = "p.id, p.author_id, p.title, p.content, p.privacy, \
     p.kind, p.media_url, p.created_at, p.updated_at";

pub(crate) const RETURNING_POST: &str = " RETURNING id, author_id, title, content, privacy, \
     kind, media_url, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) author_id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) privacy: Privacy,
    pub(crate) kind: PostKind,
    pub(crate) media_url: Option<String>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            privacy: row.privacy,
            kind: row.kind,
            media_url: row.media_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FeedItemRow {
    #[sqlx(flatten)]
    pub(crate) post: PostRow,
    pub(crate) like_count: i64,
    pub(crate) comment_count: i64,
}

impl TryFrom<FeedItemRow> for FeedItem {
    type Error = RepoError;

    fn try_from(row: FeedItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            post: row.post.into(),
            like_count: convert_count(row.like_count)?,
            comment_count: convert_count(row.comment_count)?,
        })
    }
}
