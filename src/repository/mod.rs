use async_trait::async_trait;

use crate::models::{Page, PageParams, User};
use crate::utils::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Storage accessor for the `users` table.
///
/// Implementations must reject a second row with an existing email with
/// [`AppError::DuplicateResource`](crate::utils::error::AppError::DuplicateResource),
/// independently of any check the caller already made.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    /// All rows ordered by id.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    async fn find_all_paged(&self, params: PageParams) -> AppResult<Page<User>>;

    /// Inserts when `user.id` is `None`, updates otherwise.
    ///
    /// Sets `created_at` on insert and refreshes `updated_at` on every call.
    async fn save(&self, user: User) -> AppResult<User>;

    /// Missing rows are not an error.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}
