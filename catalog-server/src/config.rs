//! Catalog server configuration

use std::path::PathBuf;
use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How malformed `filters` payloads on product listings are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Malformed filters fail the request with 400
    #[default]
    Strict,
    /// Malformed filters are logged and ignored (legacy clients)
    Lenient,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("FILTER_MODE must be strict or lenient, got {other}")),
        }
    }
}

/// What to do with product extra-attribute keys that match no attribute in scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownAttributePolicy {
    Reject,
    #[default]
    Warn,
}

impl FromStr for UnknownAttributePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "warn" => Ok(Self::Warn),
            other => Err(format!(
                "UNKNOWN_ATTRIBUTE_POLICY must be reject or warn, got {other}"
            )),
        }
    }
}

/// Telegram Bot API settings for order notifications
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Base URL of the Bot API (overridable for tests and proxies)
    pub api_base: String,
}

/// Catalog server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// Bearer token lifetime
    pub jwt_expiry_hours: i64,
    /// Admin account created at startup when both are set
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Prefix of the URLs returned for uploaded images
    pub public_base_url: String,
    /// Image host substitution applied to served image references
    pub image_host_from: Option<String>,
    pub image_host_to: Option<String>,
    pub filter_mode: FilterMode,
    pub unknown_attribute_policy: UnknownAttributePolicy,
    /// Order notification sink; disabled when unset
    pub telegram: Option<TelegramConfig>,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db".into(),
            http_port: 5000,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            jwt_expiry_hours: 24,
            admin_username: None,
            admin_password: None,
            upload_dir: PathBuf::from("uploads"),
            public_base_url: "http://localhost:5000".into(),
            image_host_from: None,
            image_host_to: None,
            filter_mode: FilterMode::default(),
            unknown_attribute_policy: UnknownAttributePolicy::default(),
            telegram: None,
            log_dir: None,
            log_json: false,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = Self::default();

        let telegram = match (
            Self::optional("TELEGRAM_BOT_TOKEN"),
            Self::optional("TELEGRAM_CHAT_ID"),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                api_base: std::env::var("TELEGRAM_API_BASE")
                    .unwrap_or_else(|_| "https://api.telegram.org".into()),
            }),
            (None, None) => None,
            _ => return Err("TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together".into()),
        };

        let filter_mode = match Self::optional("FILTER_MODE") {
            Some(v) => v.parse()?,
            None => FilterMode::default(),
        };
        let unknown_attribute_policy = match Self::optional("UNKNOWN_ATTRIBUTE_POLICY") {
            Some(v) => v.parse()?,
            None => UnknownAttributePolicy::default(),
        };

        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.http_port);

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            http_port,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.jwt_expiry_hours),
            admin_username: Self::optional("ADMIN_USERNAME"),
            admin_password: Self::optional("ADMIN_PASSWORD"),
            upload_dir: Self::optional("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            public_base_url: Self::optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{http_port}")),
            image_host_from: Self::optional("IMAGE_HOST_FROM"),
            image_host_to: Self::optional("IMAGE_HOST_TO"),
            filter_mode,
            unknown_attribute_policy,
            telegram,
            log_dir: Self::optional("LOG_DIR"),
            log_json: Self::optional("LOG_JSON").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!("strict".parse::<FilterMode>(), Ok(FilterMode::Strict));
        assert_eq!(" Lenient ".parse::<FilterMode>(), Ok(FilterMode::Lenient));
        assert!("open".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_unknown_attribute_policy_parse() {
        assert_eq!(
            "REJECT".parse::<UnknownAttributePolicy>(),
            Ok(UnknownAttributePolicy::Reject)
        );
        assert_eq!(
            "warn".parse::<UnknownAttributePolicy>(),
            Ok(UnknownAttributePolicy::Warn)
        );
        assert!("ignore".parse::<UnknownAttributePolicy>().is_err());
    }

    #[test]
    fn test_require_secret_outside_development() {
        let missing = "CATALOG_TEST_SECRET_THAT_IS_NEVER_SET";
        assert!(Config::require_secret(missing, "production").is_err());
        let dev = Config::require_secret(missing, "development").unwrap();
        assert!(dev.starts_with("dev-"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.filter_mode, FilterMode::Strict);
        assert_eq!(config.unknown_attribute_policy, UnknownAttributePolicy::Warn);
        assert!(config.telegram.is_none());
    }
}
