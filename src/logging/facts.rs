use log::Level;
use serde_json::Value;

/// Receives one structured fact per completed (or abandoned) operation.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-readable trace lines for each protocol step.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Forwards everything to the `log` facade. Facts go out at debug level as a
/// single JSON line under the `atomic_fs::facts` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl FactsEmitter for LogSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        log::debug!(target: "atomic_fs::facts", "{subsystem} {event} {decision} {fields}");
    }
}

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "atomic_fs", level, "{msg}");
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FactsEmitter for NullSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for NullSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
