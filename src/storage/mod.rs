//! 存储层模块
//!
//! 提供数据持久化服务，支持进程内存储和 SurrealDB。

pub mod factory;
pub mod memory;
pub mod repository;

#[cfg(feature = "surrealdb")]
pub mod surrealdb;

#[cfg(feature = "surrealdb")]
pub mod surrealdb_repository;

pub use factory::{Storage, StorageFactory};
