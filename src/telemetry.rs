use std::sync::OnceLock;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
/// Safe to call more than once.
pub fn init(verbose: bool) {
    LOGGING.get_or_init(|| {
        let fallback = if verbose { "bookfind=debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
