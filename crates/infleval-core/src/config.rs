use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::error::ConfigError;
use crate::influencer::DEFAULT_PLATFORM;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Core parsing/validation, decoupled from the process environment so tests
/// can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("INFLEVAL_ENV", "development"))?;

    let api_base_url = or_default("INFLEVAL_API_BASE_URL", "http://localhost:8000/api");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "INFLEVAL_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    let request_timeout_secs = parse_u64("INFLEVAL_REQUEST_TIMEOUT_SECS", "20")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "INFLEVAL_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("INFLEVAL_USER_AGENT", "infleval/0.1 (report-client)");
    let log_level = or_default("INFLEVAL_LOG_LEVEL", "info");
    let credentials_path =
        PathBuf::from(or_default("INFLEVAL_CREDENTIALS_PATH", "./.infleval/token"));
    let export_dir = PathBuf::from(or_default("INFLEVAL_EXPORT_DIR", "."));
    let platform = or_default("INFLEVAL_PLATFORM", DEFAULT_PLATFORM);

    Ok(AppConfig {
        env,
        api_base_url,
        request_timeout_secs,
        user_agent,
        log_level,
        credentials_path,
        export_dir,
        platform,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INFLEVAL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(
            parse_environment("development").unwrap(),
            Environment::Development
        );
        assert_eq!(parse_environment("test").unwrap(), Environment::Test);
        assert_eq!(
            parse_environment("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn parse_environment_unknown_fails() {
        let err = parse_environment("staging").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "INFLEVAL_ENV"));
    }

    #[test]
    fn empty_env_uses_defaults() {
        let map = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.api_base_url, "http://localhost:8000/api");
        assert_eq!(cfg.request_timeout_secs, 20);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.credentials_path, PathBuf::from("./.infleval/token"));
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert_eq!(cfg.platform, "instagram");
    }

    #[test]
    fn overrides_are_applied() {
        let mut map = HashMap::new();
        map.insert("INFLEVAL_ENV", "production");
        map.insert("INFLEVAL_API_BASE_URL", "https://eval.example.com/api");
        map.insert("INFLEVAL_REQUEST_TIMEOUT_SECS", "5");
        map.insert("INFLEVAL_EXPORT_DIR", "/tmp/exports");
        map.insert("INFLEVAL_PLATFORM", "tiktok");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Production);
        assert_eq!(cfg.api_base_url, "https://eval.example.com/api");
        assert_eq!(cfg.request_timeout_secs, 5);
        assert_eq!(cfg.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(cfg.platform, "tiktok");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut map = HashMap::new();
        map.insert("INFLEVAL_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        let rejected = matches!(
            &result,
            Err(ConfigError::InvalidEnvVar { var, .. }) if var == "INFLEVAL_REQUEST_TIMEOUT_SECS"
        );
        assert!(
            rejected,
            "expected InvalidEnvVar(INFLEVAL_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );

        map.insert("INFLEVAL_REQUEST_TIMEOUT_SECS", "0");
        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut map = HashMap::new();
        map.insert("INFLEVAL_API_BASE_URL", "localhost:8000");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INFLEVAL_API_BASE_URL"
        ));
    }
}
