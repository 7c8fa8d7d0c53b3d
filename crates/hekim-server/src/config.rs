//! Command-line and environment configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HEKIM_HOST` | 127.0.0.1 | Host to bind |
//! | `HEKIM_PORT` | 8080 | Port to listen on |
//! | `HEKIM_DB_URL` | ws://127.0.0.1:8000 | SurrealDB endpoint (`mem://` for in-process) |
//! | `HEKIM_REDIS_URL` | unset | Redis URL; unset uses the in-process store |
//! | `HEKIM_JWT_SECRET` | required | HS256 signing secret |
//! | `HEKIM_SEED_FILE` | unset | Reference catalog seed applied to an empty database |

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hekim_auth::AuthConfig;
use hekim_cache::{CacheConfig, RedisConfig};
use hekim_db::DbConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "hekim")]
#[command(about = "Multi-tenant hospital administration backend")]
pub struct ServerConfig {
    /// Host address to bind to.
    #[arg(long, env = "HEKIM_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "HEKIM_PORT", default_value = "8080")]
    pub port: u16,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, env = "HEKIM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "HEKIM_DB_URL", default_value = "ws://127.0.0.1:8000")]
    pub db_url: String,

    #[arg(long, env = "HEKIM_DB_NAMESPACE", default_value = "hekim")]
    pub db_namespace: String,

    #[arg(long, env = "HEKIM_DB_DATABASE", default_value = "main")]
    pub db_database: String,

    #[arg(long, env = "HEKIM_DB_USER", default_value = "root")]
    pub db_user: String,

    #[arg(long, env = "HEKIM_DB_PASS", default_value = "root", hide_env_values = true)]
    pub db_pass: String,

    /// Redis URL for the cache and reset codes.
    #[arg(long, env = "HEKIM_REDIS_URL")]
    pub redis_url: Option<String>,

    #[arg(long, env = "HEKIM_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Session token lifetime in seconds.
    #[arg(long, env = "HEKIM_TOKEN_LIFETIME", default_value = "86400")]
    pub token_lifetime_secs: u64,

    /// Reference-data cache lifetime in seconds.
    #[arg(long, env = "HEKIM_CACHE_TTL", default_value = "3600")]
    pub cache_ttl_secs: u64,

    /// Upper bound on a single cache round trip, in milliseconds.
    #[arg(long, env = "HEKIM_CACHE_TIMEOUT_MS", default_value = "250")]
    pub cache_timeout_ms: u64,

    /// JSON seed for the reference catalogs.
    #[arg(long, env = "HEKIM_SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn db(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_user.clone(),
            password: self.db_pass.clone(),
        }
    }

    pub fn redis(&self) -> Option<RedisConfig> {
        self.redis_url.clone().map(|url| RedisConfig { url })
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_lifetime_secs: self.token_lifetime_secs,
            ..AuthConfig::default()
        }
    }

    pub fn cache(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.cache_ttl_secs),
            op_timeout: Duration::from_millis(self.cache_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_the_secret_is_given() {
        let config = ServerConfig::try_parse_from(["hekim", "--jwt-secret", "s"]).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert!(config.redis().is_none());
        assert_eq!(config.auth().token_lifetime_secs, 86_400);
        assert_eq!(config.cache().ttl, Duration::from_secs(3600));
        assert_eq!(config.db().namespace, "hekim");
    }
}
