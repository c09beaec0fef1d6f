use thiserror::Error;

use crate::config::ConfigError;
use crate::operation::registry::RegistryError;
use crate::parser::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    // fixed-point driver
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type KakkoResult<T> = Result<T, Error>;

// エラー作成用のヘルパー関数
impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
