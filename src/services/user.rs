//! 用户服务

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{User, Username};
use crate::storage::repository::UserRepository;
use std::sync::Arc;

/// 用户服务 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// 注册用户，用户名非法或已存在时返回验证错误
    async fn register(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User>;

    async fn get(&self, username: &Username) -> Result<User>;

    /// 删除用户及其关注关系、帖子和评论
    async fn delete(&self, username: &Username) -> Result<()>;
}

/// 用户服务实现
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn register(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User> {
        let username = Username::parse(username)?;
        let user = User::new(username)
            .with_name(first_name, last_name)
            .with_email(email);

        let user = self.repository.create(&user).await?;
        info!("Registered user {}", user.username);
        Ok(user)
    }

    async fn get(&self, username: &Username) -> Result<User> {
        self.repository
            .get(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
    }

    async fn delete(&self, username: &Username) -> Result<()> {
        if !self.repository.delete(username).await? {
            return Err(AppError::NotFound(format!("User {} not found", username)));
        }
        debug!("Deleted user {}", username);
        Ok(())
    }
}

/// 创建用户服务
pub fn create_user_service(repository: Arc<dyn UserRepository>) -> Box<dyn UserService> {
    Box::new(UserServiceImpl::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn service() -> UserServiceImpl {
        UserServiceImpl::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let service = service();
        let user = service
            .register("alice", "Alice", "Liddell", "alice@example.com")
            .await
            .unwrap();
        assert_eq!(user.username.as_str(), "alice");

        let fetched = service.get(&Username::new("alice")).await.unwrap();
        assert_eq!(fetched.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_names() {
        let service = service();
        service.register("alice", "", "", "").await.unwrap();

        assert!(matches!(
            service.register("alice", "", "", "").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.register("not valid", "", "", "").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let service = service();
        let ghost = Username::new("ghost");
        assert!(matches!(service.get(&ghost).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(&ghost).await, Err(AppError::NotFound(_))));
    }
}
