use crate::config::{Config, Durability};
use crate::logging::{AuditSink, FactsEmitter, LogSink};
use crate::types::TextEncoding;

/// Builder for constructing an `AtomicFs` with ergonomic chaining.
/// Starts from `log`-backed sinks and `Config::default()`.
pub struct AtomicFsBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    config: Config,
}

impl Default for AtomicFsBuilder<LogSink, LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicFsBuilder<LogSink, LogSink> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            facts: LogSink,
            audit: LogSink,
            config: Config::default(),
        }
    }
}

impl<E: FactsEmitter, A: AuditSink> AtomicFsBuilder<E, A> {
    pub fn facts<E2: FactsEmitter>(self, facts: E2) -> AtomicFsBuilder<E2, A> {
        AtomicFsBuilder {
            facts,
            audit: self.audit,
            config: self.config,
        }
    }

    pub fn audit<A2: AuditSink>(self, audit: A2) -> AtomicFsBuilder<E, A2> {
        AtomicFsBuilder {
            facts: self.facts,
            audit,
            config: self.config,
        }
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.config.dir_mode = mode;
        self
    }

    #[must_use]
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    #[must_use]
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    #[must_use]
    pub fn durability(mut self, durability: Durability) -> Self {
        self.config.durability = durability;
        self
    }

    pub fn build(self) -> super::AtomicFs<E, A> {
        super::AtomicFs::new(self.facts, self.audit, self.config)
    }
}
