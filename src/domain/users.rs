use crate::domain::error::DomainError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const DISPLAY_NAME_MAX_LEN: usize = 100;
pub const BIO_MAX_LEN: usize = 500;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Usernames compare case-insensitively.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(DomainError::validation(
            "password",
            format!("password must be {PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters"),
        ));
    }
    if password.trim().is_empty() {
        return Err(DomainError::validation("password", "password must not be blank"));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(DomainError::validation(
            "username",
            format!("username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"),
        ));
    }
    if !username.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(DomainError::validation(
            "username",
            "username may only contain ASCII letters and digits",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("email", "email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("email", "email is malformed"));
    }
    Ok(())
}

/// Trims optional profile text, dropping blank values.
pub fn normalize_profile_field(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, DomainError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > max_len {
        return Err(DomainError::validation(
            field,
            format!("{field} must be at most {max_len} characters"),
        ));
    }
    Ok(Some(value.to_string()))
}
