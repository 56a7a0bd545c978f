use crate::config::config::{AppConfig, DatabaseBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use std::path::PathBuf;

/// 环境变量前缀
const ENV_PREFIX: &str = "BLOGFEED_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序（后者覆盖前者）：
    /// 1. 开发环境默认值
    /// 2. ./config.toml
    /// 3. ./config.yaml
    /// 4. 环境变量（`BLOGFEED_SERVER__PORT=9000`）
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::figment(default_config_path()).extract()
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Yaml::file("config.yaml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.database.backend == DatabaseBackend::SurrealDB && config.database.url.is_empty()
        {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if config.security.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingJwtSecret);
        }

        if config.feed.page_size == 0 {
            return Err(ConfigValidationError::InvalidPageSize);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("数据库连接 URL 未配置")]
    MissingDatabaseUrl,

    #[error("JWT 密钥未配置")]
    MissingJwtSecret,

    #[error("每页数量无效，必须大于 0")]
    InvalidPageSize,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config_is_valid() {
        assert!(ConfigLoader::validate(&AppConfig::development()).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = AppConfig::development();
        config.feed.page_size = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPageSize)
        ));
    }

    #[test]
    fn test_validate_requires_url_for_surrealdb() {
        let mut config = AppConfig::production();
        config.database.url.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn test_load_from_missing_file_keeps_defaults() {
        let config = ConfigLoader::load_from(PathBuf::from("does-not-exist.toml")).unwrap();
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.security.login_url, "/auth/login");
    }
}
