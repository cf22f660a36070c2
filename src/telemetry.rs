use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Filter from `RUST_LOG`, or `default` when unset/invalid.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber: env filter, one compact fmt layer for
/// the workspace, and the generation client's own layer.
///
/// - RFC3339 UTC timestamps
/// - target (module path) and `file:line`
/// - span close events, so `#[instrument]`ed calls report their duration
/// - ANSI colors only when stdout is a terminal
pub fn init(default: &str) -> Result<(), TryInitError> {
    let use_ansi = io::stdout().is_terminal();

    let fmt_layer = fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .compact()
        .with_filter(filter::filter_fn(|meta| {
            !ai_llm_service::telemetry::is_own_target(meta.target())
        }));

    tracing_subscriber::registry()
        .with(env_filter(default))
        .with(fmt_layer)
        .with(ai_llm_service::telemetry::layer())
        .try_init()
}
