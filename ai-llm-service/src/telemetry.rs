//! Library-scoped log layer for generation calls.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, filter, fmt};

/// Crate target prefix used to route library-originated logs.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// RFC3339 UTC timer with millisecond precision.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Millis;

impl FormatTime for ChronoRfc3339Millis {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }
}

/// `true` for event and span targets that belong to this crate.
pub fn is_own_target(target: &str) -> bool {
    target.starts_with(TARGET_PREFIX)
}

/// Formatting layer that renders ONLY events emitted by this crate.
///
/// Compose it in the binary next to the global fmt layer, and keep the
/// global layer away from [`is_own_target`] events to avoid printing twice.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Millis)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        // span close carries the duration of `generate`
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .compact()
        .with_filter(filter::filter_fn(|meta| is_own_target(meta.target())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_crate_target() {
        assert!(is_own_target("ai_llm_service"));
        assert!(is_own_target("ai_llm_service::services::hugging_face_service"));
        assert!(!is_own_target("api::dispatch"));
        assert!(!is_own_target("git_context_engine::git_providers::github"));
    }
}
