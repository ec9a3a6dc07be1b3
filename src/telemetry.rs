use crate::config::{LogFormat, LoggingCfg};
use crate::error::{PayStreamError, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. Logs go to stderr; stdout carries results.
///
/// `RUST_LOG` wins over the configured level. `verbose` bumps this crate to
/// `debug`.
pub fn init(cfg: &LoggingCfg, verbose: bool) -> Result<()> {
    let directive = if verbose {
        "pay_stream=debug".to_string()
    } else {
        format!("pay_stream={}", cfg.level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match cfg.format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
    installed.map_err(|e| PayStreamError::ConfigError(format!("logging: {}", e)))
}
