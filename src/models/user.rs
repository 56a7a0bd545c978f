//! 用户与身份模型

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};

/// 用户名允许的字符：字母、数字以及 `@ . + - _`
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]{1,150}$").expect("valid username pattern"));

/// 用户名，用户的唯一标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 解析并校验用户名
    pub fn parse(value: &str) -> Result<Self> {
        if USERNAME_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::Validation(format!("Invalid username: {:?}", value)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 用户名
    pub username: Username,
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
    /// 邮箱
    pub email: String,
    /// 注册时间
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// 创建新用户
    pub fn new(username: Username) -> Self {
        Self {
            username,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            date_joined: Utc::now(),
        }
    }

    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }
}

/// 请求方身份
///
/// 匿名身份在任何关注关系中都不成立，其信息流恒为空。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    User(Username),
}

impl Identity {
    pub fn user(&self) -> Option<&Username> {
        match self {
            Identity::Anonymous => None,
            Identity::User(username) => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User(_))
    }
}

impl From<Username> for Identity {
    fn from(username: Username) -> Self {
        Identity::User(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("bob.smith")]
    #[case("c+d@e-f_g")]
    fn test_valid_usernames(#[case] value: &str) {
        assert_eq!(Username::parse(value).unwrap().as_str(), value);
    }

    #[rstest]
    #[case("")]
    #[case("with space")]
    #[case("slash/name")]
    fn test_invalid_usernames(#[case] value: &str) {
        assert!(matches!(Username::parse(value), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_anonymous_identity_has_no_user() {
        assert_eq!(Identity::default(), Identity::Anonymous);
        assert!(Identity::Anonymous.user().is_none());
        assert!(!Identity::Anonymous.is_authenticated());

        let identity = Identity::from(Username::new("alice"));
        assert_eq!(identity.user().map(Username::as_str), Some("alice"));
    }
}
