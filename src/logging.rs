//! tracing-subscriber setup driven by [`LoggingConfig`].

use crate::config::{LogFormat, LoggingConfig};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the configuration names one
const FALLBACK_LEVEL: &str = "info";

/// Subscriber for the window before the configuration is known.
///
/// Meant for `tracing::subscriber::with_default` around the configuration
/// load, so the loader's own events are not lost. Honours `RUST_LOG`.
pub fn startup_subscriber<W>(make_writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .compact()
        .finish()
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("logging already initialised: {e}");
    }
}
