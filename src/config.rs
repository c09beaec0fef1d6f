use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings shared by every parse call of a [`crate::Parser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Upper bound on driver passes before the input is reported as non-convergent.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_fetch_timeout", with = "duration_ms")]
    pub fetch_timeout: Duration,

    #[serde(default = "default_max_fetch_bytes")]
    pub max_fetch_bytes: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_max_repeat")]
    pub max_repeat: usize,

    /// Largest output, in bytes, a single `repeat` may produce.
    #[serde(default = "default_max_repeat_bytes")]
    pub max_repeat_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            fetch_timeout: default_fetch_timeout(),
            max_fetch_bytes: default_max_fetch_bytes(),
            user_agent: default_user_agent(),
            max_repeat: default_max_repeat(),
            max_repeat_bytes: default_max_repeat_bytes(),
        }
    }
}

impl ParserConfig {
    // JSONファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "fetch_timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// デフォルト値の定義
fn default_max_iterations() -> usize {
    10_000
}
fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_max_fetch_bytes() -> usize {
    1024 * 1024
}
fn default_user_agent() -> String {
    format!("kakko/{}", env!("CARGO_PKG_VERSION"))
}
fn default_max_repeat() -> usize {
    100_000
}
fn default_max_repeat_bytes() -> usize {
    4 * 1024 * 1024
}

// Duration型のシリアライズ/デシリアライズヘルパー
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
