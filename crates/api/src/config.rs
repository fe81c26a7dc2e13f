use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Invalid or missing server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the session secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Primary database URL. Without it every request is served by the
    /// fallback document.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections (default: `5`).
    pub db_max_connections: u32,
    /// URL of the shared fallback document. Without it an in-process
    /// document is used, which does not survive a restart.
    pub fallback_document_url: Option<String>,
    /// Per-request timeout for the fallback document in seconds (default: `10`).
    pub fallback_timeout_secs: u64,
    /// How often expired trash is purged, in seconds (default: `3600`).
    pub trash_purge_interval_secs: u64,
    /// Admin login and session settings.
    pub admin: AdminConfig,
    /// Media host receiving photo uploads.
    pub media: MediaConfig,
}

/// The single back-office account and its session signing settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: Option<String>,
    /// Argon2id PHC string.
    pub password_hash: Option<String>,
    pub jwt: JwtConfig,
}

/// Where uploaded photos are forwarded. Uploads are disabled while
/// `base_url` is unset.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub base_url: Option<String>,
    pub upload_secret: Option<String>,
    pub upload_timeout_secs: u64,
}

impl MediaConfig {
    /// `(base_url, upload_secret)` when uploads are enabled.
    pub fn upload_target(&self) -> Option<(&str, &str)> {
        match (&self.base_url, &self.upload_secret) {
            (Some(url), Some(secret)) => Some((url.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl AdminConfig {
    /// `(username, password_hash)` when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password_hash) {
            (Some(user), Some(hash)) => Some((user.as_str(), hash.as_str())),
            _ => None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                        |
    /// |-----------------------------|--------------------------------|
    /// | `HOST`                      | `0.0.0.0`                      |
    /// | `PORT`                      | `3000`                         |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                           |
    /// | `DATABASE_URL`              | unset                          |
    /// | `DB_MAX_CONNECTIONS`        | `5`                            |
    /// | `FALLBACK_DOCUMENT_URL`     | unset                          |
    /// | `FALLBACK_TIMEOUT_SECS`     | `10`                           |
    /// | `TRASH_PURGE_INTERVAL_SECS` | `3600`                         |
    /// | `ADMIN_USERNAME`            | unset                          |
    /// | `ADMIN_PASSWORD_HASH`       | unset                          |
    /// | `ADMIN_JWT_SECRET`          | **required**                   |
    /// | `MEDIA_BASE_URL`            | unset                          |
    /// | `UPLOAD_SECRET`             | required with `MEDIA_BASE_URL` |
    /// | `UPLOAD_TIMEOUT_SECS`       | `60`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&var, "PORT", 3000)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?;
        let database_url = var("DATABASE_URL");
        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", 5)?;
        let fallback_document_url = var("FALLBACK_DOCUMENT_URL");
        let fallback_timeout_secs = parse_or(&var, "FALLBACK_TIMEOUT_SECS", 10)?;
        let trash_purge_interval_secs = parse_or(&var, "TRASH_PURGE_INTERVAL_SECS", 3600)?;

        if trash_purge_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "TRASH_PURGE_INTERVAL_SECS",
                value: "0".into(),
            });
        }

        let admin = AdminConfig {
            username: var("ADMIN_USERNAME"),
            password_hash: var("ADMIN_PASSWORD_HASH"),
            jwt: JwtConfig::new(
                var("ADMIN_JWT_SECRET").ok_or(ConfigError::Missing("ADMIN_JWT_SECRET"))?,
            ),
        };

        let media = MediaConfig {
            base_url: var("MEDIA_BASE_URL"),
            upload_secret: var("UPLOAD_SECRET"),
            upload_timeout_secs: parse_or(&var, "UPLOAD_TIMEOUT_SECS", 60)?,
        };
        if media.base_url.is_some() && media.upload_secret.is_none() {
            return Err(ConfigError::Missing("UPLOAD_SECRET"));
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            fallback_document_url,
            fallback_timeout_secs,
            trash_purge_interval_secs,
            admin,
            media,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("ADMIN_JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.database_url, None);
        assert_eq!(config.trash_purge_interval_secs, 3600);
        assert!(config.admin.credentials().is_none());
        assert_eq!(config.admin.jwt.session_expiry_days, 7);
        assert!(config.media.upload_target().is_none());
        assert_eq!(config.media.upload_timeout_secs, 60);
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ADMIN_JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.test, https://b.test,"),
            ("DATABASE_URL", "postgres://localhost/lodge"),
            ("ADMIN_USERNAME", "owner"),
            ("ADMIN_PASSWORD_HASH", "$argon2id$v=19$..."),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["https://a.test", "https://b.test"]);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/lodge"));
        assert_eq!(config.admin.credentials().map(|(u, _)| u), Some("owner"));
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert_matches!(
            ServerConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("ADMIN_JWT_SECRET"))
        );
    }

    #[test]
    fn media_host_needs_upload_secret() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("ADMIN_JWT_SECRET", "s"),
            ("MEDIA_BASE_URL", "https://media.test"),
        ]));
        assert_matches!(result, Err(ConfigError::Missing("UPLOAD_SECRET")));

        let config = ServerConfig::from_lookup(lookup(&[
            ("ADMIN_JWT_SECRET", "s"),
            ("MEDIA_BASE_URL", "https://media.test"),
            ("UPLOAD_SECRET", "shared"),
        ]))
        .unwrap();
        assert_eq!(
            config.media.upload_target(),
            Some(("https://media.test", "shared"))
        );
    }

    #[test]
    fn unparsable_number_is_an_error() {
        let result =
            ServerConfig::from_lookup(lookup(&[("ADMIN_JWT_SECRET", "s"), ("PORT", "eighty")]));
        assert_matches!(result, Err(ConfigError::Invalid { key: "PORT", .. }));
    }
}
