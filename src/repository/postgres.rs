use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::UserRepository;
use crate::models::{Page, PageParams, User};
use crate::utils::error::{AppError, AppResult};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, address, created_at, updated_at";

/// PostgreSQL implementation backed by a shared connection pool.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email, phone, address, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING {}",
            USER_COLUMNS
        );

        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &user.email))?;

        tracing::debug!(user_id = ?saved.id, "Inserted user row");
        Ok(saved)
    }

    async fn update(&self, id: i64, user: User) -> AppResult<User> {
        let sql = format!(
            "UPDATE users \
             SET first_name = $2, last_name = $3, email = $4, phone = $5, address = $6, updated_at = $7 \
             WHERE id = $1 \
             RETURNING {}",
            USER_COLUMNS
        );

        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &user.email))?
            .ok_or_else(|| AppError::user_not_found(id))?;

        tracing::debug!(user_id = id, "Updated user row");
        Ok(saved)
    }
}

/// The unique index on `email` is the final word on duplicates; a violation
/// surfaces the same way as the service-level pre-check.
fn map_write_error(err: sqlx::Error, email: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::duplicate_email(email)
        }
        _ => AppError::DatabaseError(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn find_all_paged(&self, params: PageParams) -> AppResult<Page<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let offset = i64::try_from(params.offset())
            .map_err(|_| AppError::validation("Page number is too large"))?;

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(i64::from(params.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(users, params, total.max(0) as u64))
    }

    async fn save(&self, user: User) -> AppResult<User> {
        match user.id {
            None => self.insert(user).await,
            Some(id) => self.update(id, user).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(user_id = id, rows = result.rows_affected(), "Deleted user row");
        Ok(())
    }
}
