use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Builds the global `tracing` subscriber for a dispatcher run.
///
/// `log_level` is one of the strings `EngineConfig::validate` accepts
/// (`trace`/`debug`/`info`/`warn`/`error`); `RUST_LOG` overrides it if set.
/// `json_logs` picks structured JSON output (for log aggregation) over the
/// human-readable default.
pub fn init_logger(log_level: &str, json_logs: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(true).with_thread_ids(true)).init();
    }
}
