// src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};

/// Average share of fingerprint words observed on the training gambling sites.
pub const DEFAULT_THRESHOLD: f64 = 0.2681992337164751;
pub const DEFAULT_FINGERPRINT_PATH: &str = "most_common_gambling_words.csv";
pub const DEFAULT_PROFILE_LIMIT: usize = 150;
/// Profiles shorter than this carry too little signal to be scored.
pub const DEFAULT_MIN_PROFILE_LEN: usize = 20;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP settings for the text extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    #[serde(default = "default_use_env_proxy")]
    pub use_env_proxy: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_use_env_proxy() -> bool {
    true
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            use_env_proxy: true,
        }
    }
}

/// Process-wide settings, built once in `main` and handed to the classifier
/// and calibrator by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// The persisted `word,count` table the fingerprint is read from.
    #[serde(default = "default_fingerprint_path")]
    pub fingerprint_path: PathBuf,
    /// Overlap ratio a page must strictly exceed to be labelled gambling.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// How many of the most frequent words make up a profile.
    #[serde(default = "default_profile_limit")]
    pub profile_limit: usize,
    #[serde(default = "default_min_profile_len")]
    pub min_profile_len: usize,
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_fingerprint_path() -> PathBuf {
    PathBuf::from(DEFAULT_FINGERPRINT_PATH)
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_profile_limit() -> usize {
    DEFAULT_PROFILE_LIMIT
}

fn default_min_profile_len() -> usize {
    DEFAULT_MIN_PROFILE_LEN
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fingerprint_path: default_fingerprint_path(),
            threshold: DEFAULT_THRESHOLD,
            profile_limit: DEFAULT_PROFILE_LIMIT,
            min_profile_len: DEFAULT_MIN_PROFILE_LEN,
            fetch: FetchConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Reads a JSON config file. Missing fields fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ClassifyError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ClassifyError::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.profile_limit == 0 {
            return Err(ClassifyError::InvalidConfig(
                "profile_limit must be greater than zero".to_string(),
            ));
        }
        if self.min_profile_len > self.profile_limit {
            return Err(ClassifyError::InvalidConfig(format!(
                "min_profile_len ({}) cannot exceed profile_limit ({})",
                self.min_profile_len, self.profile_limit
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ClassifyError::InvalidConfig(
                "fetch.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
