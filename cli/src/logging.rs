//! Log setup for `phantom-link`.
//!
//! Everything goes to stderr. Stdout is reserved for links and decoded
//! wallet responses, so `phantom-link connect ... | xclip` copies a clean URL.
//!
//! The filter comes from `RUST_LOG` when set. Otherwise the binary logs at
//! `info`, and `--verbose` turns on the library's `debug!` events (one per
//! link built, carrying method, cluster and sizes, never key material).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "phantom_link=info,phantom_deeplink=info";

/// Filter used when `RUST_LOG` is unset and `--verbose` is given.
const VERBOSE_FILTER: &str = "phantom_link=debug,phantom_deeplink=debug";

/// Log output format, selected with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; everything else is pretty output.
    pub fn from_str_lossy(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global subscriber. Call once, before any command runs.
///
/// ```text
/// RUST_LOG=phantom_deeplink=trace phantom-link sign ...
/// phantom-link --verbose --log-format json decode-connect "$REDIRECT"
/// ```
pub fn init_logging(format: LogFormat, verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).without_time())
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(false))
            .init(),
    }

    tracing::debug!(?format, verbose, "logging initialized");
}
