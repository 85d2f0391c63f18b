use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Root of the backend's REST API, including the `/api` prefix.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
    /// File holding the bearer token between invocations.
    pub credentials_path: PathBuf,
    /// Directory CSV exports are written into.
    pub export_dir: PathBuf,
    /// Platform attached to newly added influencers.
    pub platform: String,
}
