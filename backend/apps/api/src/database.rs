//! Database Pool
//!
//! The pool is created lazily: no connection is opened until the first
//! query, so the server starts even while the database is unreachable.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use crate::config::{AppEnv, DatabaseConfig};

const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection options for the configured database
///
/// With `encrypt` set, TLS is required; the certificate check is skipped
/// only in development.
pub fn connect_options(config: &DatabaseConfig, env: AppEnv) -> PgConnectOptions {
    let ssl_mode = match (config.encrypt, env.is_development()) {
        (false, _) => PgSslMode::Disable,
        (true, true) => PgSslMode::Require,
        (true, false) => PgSslMode::VerifyFull,
    };

    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .ssl_mode(ssl_mode);

    if !config.name.is_empty() {
        options = options.database(&config.name);
    }

    options
}

/// Build the shared, lazily connecting pool
pub fn lazy_pool(config: &DatabaseConfig, env: AppEnv) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(0)
        .idle_timeout(IDLE_TIMEOUT)
        .connect_lazy_with(connect_options(config, env))
}
