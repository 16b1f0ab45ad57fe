use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Applies when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_DIRECTIVE: &str = "cdjournal=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Logs go to stderr so report output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
