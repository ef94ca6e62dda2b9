use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(level: &str) -> AppResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|err| AppError::Configuration(format!("invalid log level {level:?}: {err}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| AppError::Configuration(format!("failed to initialise logging: {err}")))
}
