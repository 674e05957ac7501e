use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `WEEKLOG_LOG=weeklog=debug`.
pub const LOG_ENV: &str = "WEEKLOG_LOG";

/// Installs a stderr subscriber filtered by `WEEKLOG_LOG` (default `warn`).
///
/// Stdout stays reserved for command output. Calling this twice is harmless.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
