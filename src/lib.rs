pub mod app_state;
pub mod audit;
pub mod classifier;
pub mod config;
pub mod explain;
pub mod history;
pub mod llm;
pub mod models;
pub mod storage;
pub mod workflow;

#[cfg(test)]
mod phi_audit;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `config::default_log_filter()` applies.
/// Calling it again is harmless: the second install is ignored.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
