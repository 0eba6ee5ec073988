//! Process-wide logger sink
//!
//! The paging layer reports dropped filters and ordering fallbacks through
//! two channels: `tracing` events (target `paging`) and a swappable
//! [`LogSink`] for callers that want the lines without a subscriber.
//!
//! The sink slot is lock-free; the last [`set_sink`] wins. The default sink
//! discards everything.

use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Receiver of log lines.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Sink that drops every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Sink backed by a closure.
///
/// ```ignore
/// paging::log::set_sink(FnSink::new(|level, message| {
///     eprintln!("[{level}] {message}");
/// }));
/// ```
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> LogSink for FnSink<F>
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, message: &str) {
        (self.0)(level, message)
    }
}

fn slot() -> &'static ArcSwap<Box<dyn LogSink>> {
    static SLOT: OnceLock<ArcSwap<Box<dyn LogSink>>> = OnceLock::new();
    SLOT.get_or_init(|| ArcSwap::from_pointee(Box::new(NullSink) as Box<dyn LogSink>))
}

/// Install `sink` process-wide, replacing the previous one.
pub fn set_sink(sink: impl LogSink + 'static) {
    slot().store(Arc::new(Box::new(sink)));
}

/// Restore the default no-op sink.
pub fn reset_sink() {
    set_sink(NullSink);
}

/// The currently installed sink.
pub fn current_sink() -> Arc<Box<dyn LogSink>> {
    slot().load_full()
}

pub(crate) fn debug(message: &str) {
    tracing::debug!(target: "paging", "{message}");
    slot().load().log(LogLevel::Debug, message);
}

pub(crate) fn info(message: &str) {
    tracing::info!(target: "paging", "{message}");
    slot().load().log(LogLevel::Info, message);
}

pub(crate) fn warning(message: &str) {
    tracing::warn!(target: "paging", "{message}");
    slot().load().log(LogLevel::Warning, message);
}

/// Log `message` with `err` and its source chain flattened into one line.
pub(crate) fn error(message: &str, err: &dyn std::error::Error) {
    let line = format!("{message}: {}", flatten_error(err));
    tracing::error!(target: "paging", "{line}");
    slot().load().log(LogLevel::Error, &line);
}

/// Render an error and every `source()` below it, outermost first.
pub fn flatten_error(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(" <- ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("inner failure")]
    struct Inner;

    fn capture() -> Arc<Mutex<Vec<(LogLevel, String)>>> {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        set_sink(FnSink::new(move |level, message: &str| {
            sink_lines.lock().unwrap().push((level, message.to_string()));
        }));
        lines
    }

    #[test]
    #[serial]
    fn test_default_sink_accepts_everything() {
        reset_sink();
        warning("nobody is listening");
        error("still nobody", &Inner);
    }

    #[test]
    #[serial]
    fn test_set_sink_receives_lines() {
        let lines = capture();
        debug("probe debug");
        info("probe info");
        warning("probe warning");
        reset_sink();
        warning("after reset");

        let lines = lines.lock().unwrap();
        assert!(lines.contains(&(LogLevel::Debug, "probe debug".to_string())));
        assert!(lines.contains(&(LogLevel::Info, "probe info".to_string())));
        assert!(lines.contains(&(LogLevel::Warning, "probe warning".to_string())));
        assert!(!lines.iter().any(|(_, m)| m == "after reset"));
    }

    #[test]
    #[serial]
    fn test_error_flattens_source_chain() {
        let lines = capture();
        error("filter dropped", &Outer(Inner));
        reset_sink();

        let lines = lines.lock().unwrap();
        assert!(lines.contains(&(
            LogLevel::Error,
            "filter dropped: outer failure <- inner failure".to_string()
        )));
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert!(LogLevel::Debug < LogLevel::Error);
    }
}
