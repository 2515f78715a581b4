use async_trait::async_trait;
use chrono::Utc;
use konsul_core::errors::StorageError;
use konsul_core::models::user::normalize_email;
use konsul_core::models::{NewUser, User};
use konsul_core::repositories::UserRepository;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::classify;
use crate::models::DbUser;

pub async fn create_user(pool: &Pool<Postgres>, user: &NewUser) -> Result<User, StorageError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, role={}", id, user.role);

    let row = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, username, email, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user.username.trim())
    .bind(normalize_email(&user.email))
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(classify)?;

    User::try_from(row).map_err(StorageError::Database)
}

pub async fn get_user_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<User>, StorageError> {
    let row = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE LOWER(email) = $1
        "#,
    )
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await
    .map_err(classify)?;

    row.map(User::try_from)
        .transpose()
        .map_err(StorageError::Database)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<User>, StorageError> {
    let row = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(classify)?;

    row.map(User::try_from)
        .transpose()
        .map_err(StorageError::Database)
}

/// [`UserRepository`] backed by Postgres.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        create_user(&self.pool, &user).await
    }

    async fn get_by_email(&self, email: String) -> Result<Option<User>, StorageError> {
        get_user_by_email(&self.pool, &email).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        get_user_by_id(&self.pool, id).await
    }
}
