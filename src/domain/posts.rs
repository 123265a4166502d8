//! Field rules for posts and comments.

use crate::domain::{error::DomainError, types::PostKind};

pub const TITLE_MIN_LEN: usize = 5;
pub const TITLE_MAX_LEN: usize = 255;
pub const COMMENT_MAX_LEN: usize = 2000;
pub const MEDIA_URL_MAX_LEN: usize = 2048;

/// Trims and checks a post title, returning the stored form.
pub fn normalize_title(raw: &str) -> Result<String, DomainError> {
    let title = raw.trim();
    let len = title.chars().count();
    if len < TITLE_MIN_LEN {
        return Err(DomainError::validation(
            "title",
            format!("title must be at least {TITLE_MIN_LEN} characters"),
        ));
    }
    if len > TITLE_MAX_LEN {
        return Err(DomainError::validation(
            "title",
            format!("title must be at most {TITLE_MAX_LEN} characters"),
        ));
    }
    Ok(title.to_string())
}

pub fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("content", "content cannot be empty"));
    }
    Ok(())
}

/// Checks that media presence matches the post kind and normalises blank URLs
/// to `None`.
pub fn validate_media(kind: PostKind, media_url: Option<&str>) -> Result<Option<String>, DomainError> {
    let media_url = media_url.map(str::trim).filter(|url| !url.is_empty());

    match (kind.requires_media(), media_url) {
        (true, None) => Err(DomainError::validation(
            "media_url",
            format!("{} posts require a media_url", kind.as_str()),
        )),
        (false, Some(_)) => Err(DomainError::validation(
            "media_url",
            "text posts cannot carry a media_url",
        )),
        (_, Some(url)) if url.len() > MEDIA_URL_MAX_LEN => Err(DomainError::validation(
            "media_url",
            format!("media_url must be at most {MEDIA_URL_MAX_LEN} bytes"),
        )),
        (_, Some(url)) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
            DomainError::validation("media_url", "media_url must be an http(s) URL"),
        ),
        (_, url) => Ok(url.map(str::to_string)),
    }
}

pub fn validate_comment(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::validation("text", "comment cannot be empty"));
    }
    if text.chars().count() > COMMENT_MAX_LEN {
        return Err(DomainError::validation(
            "text",
            format!("comment must be at most {COMMENT_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_before_length_check() {
        assert_eq!(normalize_title("  Hello World  ").unwrap(), "Hello World");
        assert!(normalize_title("   Hey   ").is_err());
        assert!(normalize_title(&"x".repeat(TITLE_MAX_LEN + 1)).is_err());
        assert!(normalize_title(&"x".repeat(TITLE_MAX_LEN)).is_ok());
    }

    #[test]
    fn content_must_not_be_blank() {
        assert!(validate_content(" \n ").is_err());
        assert!(validate_content("hi").is_ok());
    }

    #[test]
    fn media_follows_post_kind() {
        assert_eq!(validate_media(PostKind::Text, None).unwrap(), None);
        assert_eq!(validate_media(PostKind::Text, Some("  ")).unwrap(), None);
        assert!(validate_media(PostKind::Text, Some("https://x.test/a.png")).is_err());
        assert!(validate_media(PostKind::Image, None).is_err());
        assert!(validate_media(PostKind::Video, Some("ftp://x.test/a.mp4")).is_err());
        assert_eq!(
            validate_media(PostKind::Image, Some("https://x.test/a.png")).unwrap(),
            Some("https://x.test/a.png".to_string())
        );
    }

    #[test]
    fn comment_bounds() {
        assert!(validate_comment("").is_err());
        assert!(validate_comment(&"c".repeat(COMMENT_MAX_LEN)).is_ok());
        assert!(validate_comment(&"c".repeat(COMMENT_MAX_LEN + 1)).is_err());
    }
}
