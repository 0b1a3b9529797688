//! Subscriber setup for programs embedding the client.
//!
//! The client only emits events: request/response dumps on
//! [`TRACE_TARGET`] and failed-response dumps on [`ERROR_TARGET`]. Traffic
//! dumps carry credentials verbatim, so every filter built here keeps
//! `vmray::trace` off unless `show_traffic` is set, whatever `level` says.

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::constants::{ERROR_TARGET, TRACE_TARGET};
use crate::error::VmrayResult;

/// Used when `level` is not a valid filter directive.
const FALLBACK_LEVEL: &str = "info";

/// Build the filter for `level` (e.g. "info" or "warn,vmray_api=debug").
///
/// Traffic dumps on [`TRACE_TARGET`] are enabled only with `show_traffic`.
pub fn log_filter(level: &str, show_traffic: bool) -> EnvFilter {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));
    let traffic = if show_traffic { "trace" } else { "off" };
    match format!("{TRACE_TARGET}={traffic}").parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Install console (stderr) and daily rolling file output as the global
/// subscriber. The file is `vmray.log` in `log_dir`, as JSON when
/// `json_output` is set.
///
/// Does nothing if a global subscriber is already installed, apart from
/// creating `log_dir`.
pub fn init_logging(
    level: &str,
    log_dir: &Path,
    json_output: bool,
    show_traffic: bool,
) -> VmrayResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, "vmray.log"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let file_layer: Box<dyn Layer<Registry> + Send + Sync> = if json_output {
        file_layer.json().boxed()
    } else {
        file_layer.with_ansi(false).boxed()
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer())
        .with(log_filter(level, show_traffic))
        .try_init()
        .ok();

    tracing::info!(
        "logging initialized at level={level}, dir={}, traffic={show_traffic}",
        log_dir.display()
    );

    Ok(LogGuard { _guard: guard })
}

/// Guard that keeps the non-blocking log writer alive.
/// Drop this to flush and close the log file.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Console-only variant of [`init_logging`].
pub fn init_console_logging(level: &str, show_traffic: bool) {
    let _ = tracing_subscriber::registry()
        .with(console_layer())
        .with(log_filter(level, show_traffic))
        .try_init();
}

fn console_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer().with_writer(std::io::stderr).with_target(true).compact()
}
