//! 存储工厂模块
//!
//! 根据配置创建相应的存储实例。

use crate::config::config::{DatabaseBackend, DatabaseConfig};
use crate::error::{AppError, Result};
use crate::storage::memory::MemoryStore;
use crate::storage::repository::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "surrealdb")]
use crate::storage::{surrealdb::SurrealPool, surrealdb_repository::SurrealStore};

/// 全部仓储的集合
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// 由同时实现全部仓储 trait 的存储构建
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + GroupRepository
            + PostRepository
            + CommentRepository
            + FollowRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }

    /// 进程内存储
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }
}

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储实例
    pub async fn create(config: &DatabaseConfig) -> Result<Storage> {
        match config.backend {
            DatabaseBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Storage::in_memory())
            }
            #[cfg(feature = "surrealdb")]
            DatabaseBackend::SurrealDB => {
                let pool = SurrealPool::new(config.clone()).await?;
                info!("Connected to SurrealDB at {}", pool.config().url);
                Ok(Storage::from_store(Arc::new(SurrealStore::new(pool.inner().await?))))
            }
            #[cfg(not(feature = "surrealdb"))]
            DatabaseBackend::SurrealDB => Err(AppError::Config(
                "SurrealDB feature is not enabled. Enable 'surrealdb' feature to use SurrealDB."
                    .into(),
            )),
        }
    }

    /// 检查存储是否可用
    pub async fn health_check(storage: &Storage) -> Result<bool> {
        storage
            .users
            .list(1, 0)
            .await
            .map(|_| true)
            .map_err(|e| AppError::Connection(e.to_string()))
    }
}
