use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use std::sync::Arc;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use tokio::sync::Mutex;
use tracing::info;

/// 表结构定义，重复执行无副作用
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS post_group SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS post SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS comment SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS follow SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS counter SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS unique_username ON TABLE user COLUMNS username UNIQUE;
    DEFINE INDEX IF NOT EXISTS unique_group_slug ON TABLE post_group COLUMNS slug UNIQUE;
    DEFINE INDEX IF NOT EXISTS unique_follow ON TABLE follow COLUMNS follower, followed UNIQUE;
    DEFINE INDEX IF NOT EXISTS follow_followed ON TABLE follow COLUMNS followed;
    DEFINE INDEX IF NOT EXISTS post_author ON TABLE post COLUMNS author;
    DEFINE INDEX IF NOT EXISTS post_group_slug ON TABLE post COLUMNS group_slug;
    DEFINE INDEX IF NOT EXISTS comment_post ON TABLE comment COLUMNS post_id;
";

/// SurrealDB 连接池
#[derive(Clone)]
pub struct SurrealPool {
    /// 数据库连接
    db: Arc<Mutex<Option<Surreal<Any>>>>,
    /// 连接配置
    config: DatabaseConfig,
}

impl SurrealPool {
    /// 创建新的连接池并初始化表结构
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let db: Surreal<Any> = connect(&config.url).await?;

        // 嵌入式引擎不需要认证
        if !config.url.starts_with("rocksdb://") && !config.url.starts_with("mem://") {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        db.query(SCHEMA).await?.check()?;
        info!("SurrealDB schema ready at {}", config.url);

        Ok(Self {
            db: Arc::new(Mutex::new(Some(db))),
            config,
        })
    }

    /// 获取内部数据库实例
    pub async fn inner(&self) -> Result<Surreal<Any>> {
        let guard = self.db.lock().await;
        guard
            .as_ref()
            .cloned()
            .ok_or_else(|| AppError::Connection("Database connection closed".to_string()))
    }

    /// 连接配置
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// 关闭连接
    pub async fn close(&self) {
        let mut guard = self.db.lock().await;
        *guard = None;
    }
}
