use std::sync::Arc;
use tracing::info;

use crate::models::{Page, PageParams, User, UserDto};
use crate::repository::UserRepository;
use crate::utils::error::{AppError, AppResult};

/// Business rules for users: existence checks, unique email, and the
/// entity to transfer-object mapping.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, dto: UserDto) -> AppResult<UserDto> {
        info!(email = %dto.email, "Creating new user");

        if self.repository.exists_by_email(&dto.email).await? {
            return Err(AppError::duplicate_email(&dto.email));
        }

        let saved = self.repository.save(User::new(dto)).await?;
        info!(user_id = ?saved.id, "User created");

        Ok(saved.into())
    }

    pub async fn get_user_by_id(&self, id: i64) -> AppResult<UserDto> {
        info!(user_id = id, "Fetching user");

        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        Ok(user.into())
    }

    pub async fn get_all_users(&self) -> AppResult<Vec<UserDto>> {
        info!("Fetching all users");

        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn get_all_users_paged(&self, params: PageParams) -> AppResult<Page<UserDto>> {
        info!(page = params.page, size = params.size, "Fetching users page");

        let params = params.normalized()?;
        let page = self.repository.find_all_paged(params).await?;
        Ok(page.map(UserDto::from))
    }

    /// Overwrites the contact fields of an existing user. Keeping the current
    /// email is always allowed; switching to another user's email is not.
    pub async fn update_user(&self, id: i64, dto: UserDto) -> AppResult<UserDto> {
        info!(user_id = id, "Updating user");

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        if user.email != dto.email && self.repository.exists_by_email(&dto.email).await? {
            return Err(AppError::duplicate_email(&dto.email));
        }

        user.apply_update(dto);

        let updated = self.repository.save(user).await?;
        info!(user_id = id, "User updated");

        Ok(updated.into())
    }

    pub async fn delete_user_by_id(&self, id: i64) -> AppResult<()> {
        info!(user_id = id, "Deleting user");

        if !self.repository.exists_by_id(id).await? {
            return Err(AppError::user_not_found(id));
        }

        self.repository.delete_by_id(id).await?;
        info!(user_id = id, "User deleted");

        Ok(())
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<UserDto> {
        info!(email = %email, "Fetching user by email");

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::user_not_found_by_email(email))?;

        Ok(user.into())
    }
}
