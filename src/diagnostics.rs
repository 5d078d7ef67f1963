//! Diagnostic reporting for the decoder.
//!
//! Every decode and load call receives a [`DiagnosticSink`]; the core only
//! tags a severity and never decides whether a message is shown.

use std::fmt;
use std::sync::Mutex;

/// Severity attached to one diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => log::Level::Error,
            Severity::Warning => log::Level::Warn,
            Severity::Info => log::Level::Info,
            Severity::Debug => log::Level::Debug,
            Severity::Trace => log::Level::Trace,
        }
    }
}

/// Receiver for decoder diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>);
}

/// Forwards diagnostics to the `log` facade under the `sif_reader` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>) {
        log::log!(target: "sif_reader", severity.into(), "{}", message);
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn records(&self) -> Vec<(Severity, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages emitted at exactly `severity`.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(level, _)| *level == severity)
            .map(|(_, message)| message)
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>) {
        let entry = (severity, message.to_string());
        match self.records.lock() {
            Ok(mut records) => records.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

/// `diag!(sink, Warning, "fmt", args..)` emits through a sink reference.
macro_rules! diag {
    ($sink:expr, $severity:ident, $($arg:tt)+) => {
        $crate::diagnostics::DiagnosticSink::emit(
            $sink,
            $crate::diagnostics::Severity::$severity,
            format_args!($($arg)+),
        )
    };
}

pub(crate) use diag;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order_and_severity() {
        let sink = RecordingSink::new();
        diag!(&sink, Warning, "marker {} unexpected", 65537);
        diag!(&sink, Debug, "data offset {:#x}", 0x400);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (Severity::Warning, "marker 65537 unexpected".to_string()));
        assert_eq!(sink.messages(Severity::Debug), vec!["data offset 0x400".to_string()]);
    }

    #[test]
    fn severity_maps_onto_log_levels() {
        assert_eq!(log::Level::from(Severity::Warning), log::Level::Warn);
        assert_eq!(log::Level::from(Severity::Trace), log::Level::Trace);
    }
}
