//! Tracing Setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppEnv;

const DEFAULT_FILTER: &str = "api=info,security=info,platform=info,tower_http=info";

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default filter. Production logs are JSON lines.
pub fn init_tracing(env: AppEnv) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if env.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
