// Fact construction for the operations of this crate.
//
// Every fact carries `ts` (operation start, RFC 3339), `path`, and
// `duration_ms`. Write facts add `tmp`, `stage` and, once resolved,
// `metadata`. Failures add `error` when a message is known.
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::constants::FACTS_SUBSYSTEM;
use crate::logging::FactsEmitter;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

#[must_use]
pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Event name of a fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    WriteResult,
    TouchResult,
    MkdirResult,
}

impl Event {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Event::WriteResult => "write.result",
            Event::TouchResult => "touch.result",
            Event::MkdirResult => "mkdir.result",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Success,
    Failure,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
        }
    }
}

/// Builder for a single fact.
pub struct FactBuilder {
    event: Event,
    fields: serde_json::Map<String, Value>,
}

impl FactBuilder {
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self {
            event,
            fields: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn maybe_field(self, key: &str, value: Option<Value>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self,
        }
    }

    pub fn emit(self, facts: &dyn FactsEmitter, decision: Decision) {
        let mut fields = self.fields;
        fields.insert("event".to_string(), json!(self.event.as_str()));
        fields.insert("decision".to_string(), json!(decision.as_str()));
        facts.emit(
            FACTS_SUBSYSTEM,
            self.event.as_str(),
            decision.as_str(),
            Value::Object(fields),
        );
    }
}
