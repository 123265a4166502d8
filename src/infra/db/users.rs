use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateUserParams, PasswordCredentials, RepoError, UserCredentials, UsersRepo,
};
use crate::domain::entities::UserRecord;
use crate::domain::types::Role;

use super::{PostgresRepositories, map_sqlx_error};

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.role, p.display_name, p.bio, u.created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    role: Role,
    display_name: Option<String>,
    bio: Option<String>,
    created_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            display_name: row.display_name,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    token_hash: Vec<u8>,
}

#[derive(sqlx::FromRow)]
struct PasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let CreateUserParams {
            username,
            email,
            role,
            display_name,
            bio,
            password_hash,
            token_prefix,
            token_hash,
        } = params;

        let id = Uuid::new_v4();
        let created_at = OffsetDateTime::now_utc();
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "INSERT INTO users \
             (id, username, email, role, password_hash, token_prefix, token_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(&username)
        .bind(&email)
        .bind(role)
        .bind(password_hash)
        .bind(token_prefix)
        .bind(token_hash)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO profiles (user_id, display_name, bio) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&display_name)
            .bind(&bio)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(UserRecord {
            id,
            username,
            email,
            role,
            display_name,
            bio,
            created_at,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u \
             LEFT JOIN profiles p ON p.user_id = u.id WHERE u.id = $1"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_credentials(
        &self,
        token_prefix: &str,
    ) -> Result<Option<UserCredentials>, RepoError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, u.token_hash FROM users u \
             LEFT JOIN profiles p ON p.user_id = u.id WHERE u.token_prefix = $1"
        );
        let row = sqlx::query_as::<_, CredentialsRow>(&sql)
            .bind(token_prefix)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|row| UserCredentials {
            user: row.user.into(),
            token_hash: row.token_hash,
        }))
    }

    async fn find_password(
        &self,
        username: &str,
    ) -> Result<Option<PasswordCredentials>, RepoError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, u.password_hash FROM users u \
             LEFT JOIN profiles p ON p.user_id = u.id WHERE u.username = $1"
        );
        let row = sqlx::query_as::<_, PasswordRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|row| PasswordCredentials {
            user: row.user.into(),
            password_hash: row.password_hash,
        }))
    }

    async fn rotate_token(
        &self,
        user_id: Uuid,
        token_prefix: &str,
        token_hash: Vec<u8>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE users SET token_prefix = $2, token_hash = $3 WHERE id = $1")
            .bind(user_id)
            .bind(token_prefix)
            .bind(token_hash)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
