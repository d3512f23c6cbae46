#![forbid(unsafe_code)]

//! Process configuration from the environment. A missing advisor key simply
//! disables reranking; everything else has a working default.

use std::path::PathBuf;

const ENV_DB_DIR: &str = "ROSTER_DB_DIR";
const ENV_ADVISOR_API_KEY: &str = "ROSTER_ADVISOR_API_KEY";
const ENV_ADVISOR_BASE_URL: &str = "ROSTER_ADVISOR_BASE_URL";
const ENV_ADVISOR_MODEL: &str = "ROSTER_ADVISOR_MODEL";
const ENV_ADVISOR_TIMEOUT_SECS: &str = "ROSTER_ADVISOR_TIMEOUT_SECS";

const DEFAULT_DB_DIR: &str = ".rosterd";
const DEFAULT_ADVISOR_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ADVISOR_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub storage_dir: PathBuf,
    pub advisor: Option<AdvisorConfig>,
}

#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let storage_dir = env_nonempty(ENV_DB_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_DIR));
        Self {
            storage_dir,
            advisor: AdvisorConfig::from_env(),
        }
    }
}

impl AdvisorConfig {
    /// `None` unless an API key is present.
    pub fn from_env() -> Option<Self> {
        let api_key = env_nonempty(ENV_ADVISOR_API_KEY)?;
        let base_url = env_nonempty(ENV_ADVISOR_BASE_URL)
            .unwrap_or_else(|| DEFAULT_ADVISOR_BASE_URL.to_string());
        let model =
            env_nonempty(ENV_ADVISOR_MODEL).unwrap_or_else(|| DEFAULT_ADVISOR_MODEL.to_string());
        let timeout_secs = env_nonempty(ENV_ADVISOR_TIMEOUT_SECS)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_ADVISOR_TIMEOUT_SECS);
        Some(Self {
            api_key,
            base_url,
            model,
            timeout_secs,
        })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
