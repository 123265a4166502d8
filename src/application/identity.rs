//! Identity: registration, password login and bearer-token authentication.
//!
//! Tokens look like `agr_<prefix>_<secret>`. Only the prefix and a SHA-256
//! hash of the secret are stored. Passwords are stored as Argon2id PHC strings.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::repos::{CreateUserParams, RepoError, UsersRepo};
use crate::domain::entities::UserRecord;
use crate::domain::types::Role;
use crate::domain::users::{
    BIO_MAX_LEN, DISPLAY_NAME_MAX_LEN, normalize_profile_field, normalize_username,
    validate_email, validate_password, validate_username,
};
use crate::domain::visibility::Viewer;

const TOKEN_TAG: &str = "agr";
const PREFIX_LEN: usize = 12;
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid bearer token")]
    Invalid,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Resolves a bearer token into the viewer it identifies.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Viewer, AuthError>;
}

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// A user together with a bearer token issued for it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub user: UserRecord,
    /// Shown once; only its hash is persisted.
    pub token: String,
}

#[derive(Clone)]
pub struct TokenIdentityService {
    users: Arc<dyn UsersRepo>,
    argon2: Argon2<'static>,
}

impl TokenIdentityService {
    pub fn new(users: Arc<dyn UsersRepo>) -> Self {
        Self::with_argon2(users, Argon2::default())
    }

    /// Uses explicit Argon2 parameters for password hashing.
    pub fn with_argon2(users: Arc<dyn UsersRepo>, argon2: Argon2<'static>) -> Self {
        Self { users, argon2 }
    }

    /// Creates a user and its profile, returning a freshly issued token.
    ///
    /// Usernames are case-insensitive and stored lowercased.
    pub async fn register(&self, command: RegisterCommand) -> Result<IssuedToken, ServiceError> {
        let username = normalize_username(&command.username);
        let email = command.email.trim().to_lowercase();
        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&command.password)?;
        let display_name = normalize_profile_field(
            "display_name",
            command.display_name.as_deref(),
            DISPLAY_NAME_MAX_LEN,
        )?;
        let bio = normalize_profile_field("bio", command.bio.as_deref(), BIO_MAX_LEN)?;

        let password_hash = self.hash_password(&command.password)?;
        let (token, token_prefix, token_hash) = issue_token();

        let user = self
            .users
            .create_user(CreateUserParams {
                username,
                email,
                role: Role::User,
                display_name,
                bio,
                password_hash,
                token_prefix,
                token_hash,
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { constraint } => {
                    ServiceError::Conflict(describe_duplicate(&constraint))
                }
                other => ServiceError::Repo(other),
            })?;

        info!(
            target = "agora::identity",
            user_id = %user.id,
            username = %user.username,
            "user registered"
        );
        Ok(IssuedToken { user, token })
    }

    /// Checks a username and password and issues a new bearer token.
    ///
    /// The previous token stops working.
    pub async fn login(&self, command: LoginCommand) -> Result<IssuedToken, ServiceError> {
        let username = normalize_username(&command.username);
        let credentials = self
            .users
            .find_password(&username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !self.verify_password(&command.password, &credentials.password_hash)? {
            info!(
                target = "agora::identity",
                user_id = %credentials.user.id,
                "login rejected"
            );
            return Err(ServiceError::InvalidCredentials);
        }

        let (token, token_prefix, token_hash) = issue_token();
        self.users
            .rotate_token(credentials.user.id, &token_prefix, token_hash)
            .await?;

        info!(
            target = "agora::identity",
            user_id = %credentials.user.id,
            "user logged in"
        );
        Ok(IssuedToken {
            user: credentials.user,
            token,
        })
    }

    pub async fn current_user(&self, viewer: &Viewer) -> Result<UserRecord, ServiceError> {
        let id = viewer.user_id().ok_or(ServiceError::Unauthenticated)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentityService {
    async fn authenticate(&self, token: &str) -> Result<Viewer, AuthError> {
        let parsed = parse_token(token).ok_or(AuthError::Invalid)?;
        let credentials = self
            .users
            .find_credentials(parsed.prefix)
            .await?
            .ok_or(AuthError::Invalid)?;

        let hashed_input = hash_secret(parsed.secret);
        if credentials.token_hash.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(AuthError::Invalid);
        }

        Ok(Viewer::user(credentials.user.id))
    }
}

impl TokenIdentityService {
    fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))
    }

    fn verify_password(&self, password: &str, stored: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(stored).map_err(|err| {
            warn!(target = "agora::identity", error = %err, "stored password hash is malformed");
            ServiceError::Internal(format!("stored password hash is malformed: {err}"))
        })?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(ServiceError::Internal(format!(
                "password verification failed: {err}"
            ))),
        }
    }
}

/// Returns the full token plus the prefix and secret hash to persist.
fn issue_token() -> (String, String, Vec<u8>) {
    let prefix = generate_prefix();
    let secret = generate_secret();
    let token = format!("{TOKEN_TAG}_{prefix}_{secret}");
    (token, prefix, hash_secret(&secret))
}

fn describe_duplicate(constraint: &str) -> String {
    if constraint.contains("username") {
        "username is already taken".to_string()
    } else if constraint.contains("email") {
        "email is already registered".to_string()
    } else {
        format!("duplicate value violates `{constraint}`")
    }
}

fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_prefix() -> String {
    Uuid::new_v4().simple().to_string()[..PREFIX_LEN].to_string()
}

fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

struct ParsedToken<'a> {
    prefix: &'a str,
    secret: &'a str,
}

fn parse_token(token: &str) -> Option<ParsedToken<'_>> {
    let mut parts = token.trim().splitn(3, '_');
    if parts.next()? != TOKEN_TAG {
        return None;
    }
    let prefix = parts.next()?;
    let secret = parts.next()?;
    if prefix.len() != PREFIX_LEN || secret.len() < MIN_SECRET_LEN {
        return None;
    }
    Some(ParsedToken { prefix, secret })
}
