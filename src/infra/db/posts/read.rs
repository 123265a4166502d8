use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::application::repos::{FeedQuery, PostsRepo, RepoError};
use crate::domain::entities::{FeedItem, PostRecord};
use crate::domain::types::Privacy;
use crate::infra::db::map_sqlx_error;
use crate::infra::db::util::convert_count;

use super::PostgresRepositories;
use super::types::{FeedItemRow, POST_COLUMNS, PostRow};

impl PostgresRepositories {
    /// Mirrors `is_visible`: public posts, plus the viewer's own posts.
    fn push_visibility<'q>(qb: &mut QueryBuilder<'q, Postgres>, viewer_id: Option<Uuid>) {
        qb.push(" WHERE (p.privacy = ");
        qb.push_bind(Privacy::Public);
        if let Some(viewer_id) = viewer_id {
            qb.push(" OR p.author_id = ");
            qb.push_bind(viewer_id);
        }
        qb.push(")");
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_feed(&self, query: FeedQuery) -> Result<Vec<FeedItem>, RepoError> {
        let offset = i64::try_from(query.offset)
            .map_err(|_| RepoError::InvalidInput {
                message: "feed offset out of range".to_string(),
            })?;

        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(
            ", (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count, \
             (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count \
             FROM posts p",
        );
        Self::push_visibility(&mut qb, query.viewer_id);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        qb.push_bind(i64::from(query.limit));
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<FeedItemRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(FeedItem::try_from).collect()
    }

    async fn count_feed(&self, viewer_id: Option<Uuid>) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        Self::push_visibility(&mut qb, viewer_id);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn has_private_posts(&self, author_id: Uuid) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM posts WHERE author_id = $1 AND privacy = $2)",
        )
        .bind(author_id)
        .bind(Privacy::Private)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }
}
