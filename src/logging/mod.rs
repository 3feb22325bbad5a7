pub mod audit;
pub mod facts;

pub use audit::{now_iso, Decision, Event, FactBuilder, TS_ZERO};
pub use facts::{AuditSink, FactsEmitter, LogSink, NullSink};
