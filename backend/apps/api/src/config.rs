//! Server Configuration
//!
//! Read from the process environment (after `.env` is loaded). Parsing works
//! over a lookup function so tests never touch the real environment.

use std::fmt;
use std::time::Duration;

use security::SecurityConfig;
use security::config::{DEFAULT_JWT_SECRET, MAX_TOKEN_TTL};
use thiserror::Error;

/// Configuration errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("JWT_SECRET must be set in production")]
    MissingJwtSecret,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
    Other,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => AppEnv::Development,
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Other,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

/// Policy for `/internal` routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalAuthMode {
    /// Forward every request
    None,
    /// Require a valid bearer token
    Jwt,
}

/// Database connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Require TLS to the database
    pub encrypt: bool,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("encrypt", &self.encrypt)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub env: AppEnv,
    pub port: u16,
    /// Path segment in `/api/{version}/...`
    pub api_version: String,
    /// Allowed CORS origins; `None` (or a `*` entry) allows any origin
    /// without credentials
    pub cors_origins: Option<Vec<String>>,
    /// Honour `X-Forwarded-For` when resolving the client IP
    pub trust_proxy: bool,
    pub internal_auth: InternalAuthMode,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

impl ServerConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .map_or(AppEnv::Development, |v| AppEnv::parse(&v));

        let defaults = SecurityConfig::default();
        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if env.is_production() => return Err(ConfigError::MissingJwtSecret),
            None => DEFAULT_JWT_SECRET.to_string(),
        };
        let security = SecurityConfig {
            jwt_secret,
            token_ttl: get("JWT_EXPIRES_IN")
                .map(|v| parse_duration_var("JWT_EXPIRES_IN", v))
                .transpose()?
                .unwrap_or(defaults.token_ttl),
            remember_me_token_ttl: get("JWT_REMEMBER_ME_EXPIRES_IN")
                .map(|v| parse_duration_var("JWT_REMEMBER_ME_EXPIRES_IN", v))
                .transpose()?
                .unwrap_or(defaults.remember_me_token_ttl),
        };

        let database = DatabaseConfig {
            host: get("DB_SERVER").unwrap_or_else(|| "localhost".to_string()),
            port: parse_number(get("DB_PORT"), "DB_PORT", 5432)?,
            user: get("DB_USER").unwrap_or_default(),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: get("DB_NAME").unwrap_or_default(),
            encrypt: parse_bool(get("DB_ENCRYPT"), "DB_ENCRYPT", false)?,
            max_connections: parse_number(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.iter().any(|origin| origin == "*"));

        let internal_auth = match get("INTERNAL_AUTH").as_deref().map(str::trim) {
            None | Some("none") => InternalAuthMode::None,
            Some("jwt") => InternalAuthMode::Jwt,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "INTERNAL_AUTH",
                    value: other.to_string(),
                    reason: "expected `none` or `jwt`",
                });
            }
        };

        Ok(Self {
            env,
            port: parse_number(get("PORT"), "PORT", 3000)?,
            api_version: get("API_VERSION").unwrap_or_else(|| "v1".to_string()),
            cors_origins,
            trust_proxy: parse_bool(get("TRUST_PROXY"), "TRUST_PROXY", false)?,
            internal_auth,
            database,
            security,
        })
    }

    /// Settings for local runs and tests
    pub fn development() -> Self {
        Self {
            env: AppEnv::Development,
            port: 3000,
            api_version: "v1".to_string(),
            cors_origins: None,
            trust_proxy: false,
            internal_auth: InternalAuthMode::None,
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: String::new(),
                password: String::new(),
                name: String::new(),
                encrypt: false,
                max_connections: 10,
            },
            security: SecurityConfig::development(),
        }
    }

    /// `/api/{version}`
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }
}

/// Parse `<n>`, `<n>s`, `<n>m`, `<n>h`, `<n>d` or `<n>w`; bare numbers are seconds
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let value: u64 = digits.parse().ok()?;
    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86_400,
        "w" => 604_800,
        _ => return None,
    };

    value.checked_mul(multiplier).map(Duration::from_secs)
}

fn parse_duration_var(key: &'static str, value: String) -> Result<Duration, ConfigError> {
    match parse_duration(&value) {
        Some(ttl) if ttl <= MAX_TOKEN_TTL => Ok(ttl),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value,
            reason: "token lifetime may not exceed 100 years",
        }),
        None => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected a duration like 2h or 30d",
        }),
    }
}

fn parse_bool(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected true or false",
        }),
    }
}

fn parse_number<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: v,
            reason: "expected a number",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.env, AppEnv::Development);
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.api_prefix(), "/api/v1");
        assert_eq!(config.cors_origins, None);
        assert!(!config.trust_proxy);
        assert_eq!(config.internal_auth, InternalAuthMode::None);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.database.encrypt);
        assert!(config.security.uses_default_secret());
        assert_eq!(config.security.token_ttl, Duration::from_secs(7200));
        assert_eq!(config.security.remember_me_token_ttl, Duration::from_secs(2_592_000));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("NODE_ENV", "production"),
            ("JWT_SECRET", "prod-secret"),
            ("JWT_EXPIRES_IN", "15m"),
            ("JWT_REMEMBER_ME_EXPIRES_IN", "1w"),
            ("PORT", "8080"),
            ("API_VERSION", "v2"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("TRUST_PROXY", "true"),
            ("DB_ENCRYPT", "true"),
            ("INTERNAL_AUTH", "jwt"),
        ])
        .unwrap();

        assert!(config.env.is_production());
        assert_eq!(config.security.jwt_secret, "prod-secret");
        assert_eq!(config.security.token_ttl, Duration::from_secs(900));
        assert_eq!(config.security.remember_me_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_prefix(), "/api/v2");
        assert_eq!(
            config.cors_origins,
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
        assert!(config.trust_proxy);
        assert!(config.database.encrypt);
        assert_eq!(config.internal_auth, InternalAuthMode::Jwt);
    }

    #[test]
    fn test_app_env_takes_precedence() {
        let config = load(&[("APP_ENV", "development"), ("NODE_ENV", "production")]).unwrap();
        assert_eq!(config.env, AppEnv::Development);
    }

    #[test]
    fn test_production_requires_secret() {
        let err = load(&[("APP_ENV", "production")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingJwtSecret));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("JWT_EXPIRES_IN", "2 fortnights")]).is_err());
        assert!(load(&[("TRUST_PROXY", "maybe")]).is_err());
        assert!(load(&[("INTERNAL_AUTH", "basic")]).is_err());
    }

    #[test]
    fn test_wildcard_cors_origin_allows_any() {
        let config = load(&[("CORS_ORIGINS", "https://a.example, *")]).unwrap();
        assert_eq!(config.cors_origins, None);

        let config = load(&[("CORS_ORIGINS", "*")]).unwrap();
        assert_eq!(config.cors_origins, None);
    }

    #[test]
    fn test_token_lifetime_upper_bound() {
        let err = load(&[("JWT_REMEMBER_ME_EXPIRES_IN", "999999999999w")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "JWT_REMEMBER_ME_EXPIRES_IN",
                ..
            }
        ));

        let config = load(&[("JWT_EXPIRES_IN", "5200w")]).unwrap();
        assert_eq!(config.security.token_ttl, Duration::from_secs(5200 * 604_800));
    }

    #[test]
    fn test_non_development_env_is_other() {
        let config = load(&[("NODE_ENV", "staging"), ("DB_ENCRYPT", "true")]).unwrap();
        assert_eq!(config.env, AppEnv::Other);
        assert!(!config.env.is_development());
        assert!(config.database.encrypt);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_duration("30d"), Some(Duration::from_secs(2_592_000)));
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration("5y"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = load(&[("DB_PASSWORD", "hunter2"), ("JWT_SECRET", "s3cr3t")]).unwrap();
        let output = format!("{:?}", config);
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("s3cr3t"));
    }
}
