use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::UserRepository;
use crate::models::{Page, PageParams, User};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|u| u.email == email && u.id != except)
    }
}

/// Process-local store with the same uniqueness guarantees as the
/// PostgreSQL table. Ids start at 1 and are never reused.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let table = self.table.read().await;
        Ok(table.email_taken(email, None))
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.contains_key(&id))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_all_paged(&self, params: PageParams) -> AppResult<Page<User>> {
        let table = self.table.read().await;
        let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);

        let content: Vec<User> = table
            .rows
            .values()
            .skip(offset)
            .take(params.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, params, table.rows.len() as u64))
    }

    async fn save(&self, mut user: User) -> AppResult<User> {
        let mut table = self.table.write().await;
        let now = Utc::now();

        if table.email_taken(&user.email, user.id) {
            return Err(AppError::duplicate_email(&user.email));
        }

        match user.id {
            None => {
                table.last_id += 1;
                let id = table.last_id;
                user.id = Some(id);
                user.created_at = Some(now);
                user.updated_at = Some(now);
                table.rows.insert(id, user.clone());
            }
            Some(id) => {
                let existing = table
                    .rows
                    .get_mut(&id)
                    .ok_or_else(|| AppError::user_not_found(id))?;
                user.created_at = existing.created_at;
                user.updated_at = Some(now);
                *existing = user.clone();
            }
        }

        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserDto;

    fn user(email: &str) -> User {
        User::new(UserDto {
            id: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            address: None,
        })
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_timestamps() {
        let repo = InMemoryUserRepository::new();

        let saved = repo.save(user("john@example.com")).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);

        let second = repo.save(user("jane@example.com")).await.unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_store() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("john@example.com")).await.unwrap();

        let result = repo.save(user("john@example.com")).await;
        assert!(matches!(result, Err(AppError::DuplicateResource(_))));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(user("john@example.com")).await.unwrap();
        let created_at = saved.created_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        saved.address = Some("221B Baker St".to_string());
        saved.created_at = None;
        let updated = repo.save(saved).await.unwrap();

        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at > created_at);
        assert_eq!(updated.address.as_deref(), Some("221B Baker St"));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let mut ghost = user("ghost@example.com");
        ghost.id = Some(40);

        let result = repo.save(ghost).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("john@example.com")).await.unwrap();

        assert!(repo.exists_by_email("john@example.com").await.unwrap());
        assert!(!repo.exists_by_email("JOHN@example.com").await.unwrap());
        assert!(repo
            .find_by_email("JOHN@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_paging_and_delete() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.save(user(&format!("user{}@example.com", i))).await.unwrap();
        }

        let page = repo
            .find_all_paged(PageParams::new(1, 2).unwrap())
            .await
            .unwrap();
        let ids: Vec<Option<i64>> = page.content.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![Some(3), Some(4)]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);

        repo.delete_by_id(3).await.unwrap();
        repo.delete_by_id(3).await.unwrap();
        assert!(!repo.exists_by_id(3).await.unwrap());
        assert_eq!(repo.find_all().await.unwrap().len(), 4);
    }
}
