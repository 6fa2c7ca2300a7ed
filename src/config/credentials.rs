use crate::utils::error::{EtlError, Result};
use std::fmt;

pub const USERNAME_VAR: &str = "KAGGLE_USERNAME";
pub const KEY_VAR: &str = "KAGGLE_KEY";

/// 發佈服務的帳號與金鑰
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

impl Credentials {
    /// 啟動時讀取，任何一個缺少都是致命錯誤
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| EtlError::MissingCredentials {
                    variable: name.to_string(),
                })
        };

        Ok(Self {
            username: read(USERNAME_VAR)?,
            key: read(KEY_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"***")
            .finish()
    }
}
