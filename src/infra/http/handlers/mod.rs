//! Request handlers and record-to-view conversions.

mod auth;
mod engagement;
mod feed;
mod health;
mod posts;
mod settings;

pub use auth::{current_user, login, register};
pub use engagement::{add_comment, like_post, list_comments, unlike_post};
pub use feed::get_feed;
pub use health::health;
pub use posts::{create_post, delete_post, get_post, set_privacy, update_post};
pub use settings::get_settings;

use agora_api_types::{CommentView, FeedItemView, FeedPageView, PostView, UserView};

use crate::application::pagination::FeedPage;
use crate::domain::entities::{CommentRecord, FeedItem, PostRecord, UserRecord};

pub(crate) fn post_to_api(post: PostRecord) -> PostView {
    PostView {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        privacy: post.privacy,
        kind: post.kind,
        media_url: post.media_url,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub(crate) fn feed_to_api(page: FeedPage<FeedItem>) -> FeedPageView {
    FeedPageView {
        items: page
            .items
            .into_iter()
            .map(|item| FeedItemView {
                post: post_to_api(item.post),
                like_count: item.like_count,
                comment_count: item.comment_count,
            })
            .collect(),
        page: page.page,
        page_size: page.page_size,
        total_count: page.total_count,
        has_more: page.has_more,
    }
}

pub(crate) fn comment_to_api(comment: CommentRecord) -> CommentView {
    CommentView {
        id: comment.id,
        post_id: comment.post_id,
        user_id: comment.user_id,
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub(crate) fn user_to_api(user: UserRecord) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
        display_name: user.display_name,
        bio: user.bio,
        created_at: user.created_at,
    }
}
