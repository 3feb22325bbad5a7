//! Shared test helpers for the atomic-fs integration tests.
#![allow(dead_code)]

use log::Level;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

use atomic_fs::logging::{AuditSink, FactsEmitter};
use atomic_fs::{AtomicFs, Config};

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl TestEmitter {
    pub fn decisions(&self, event: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.1 == event)
            .map(|e| e.2.clone())
            .collect()
    }
}

/// Captures audit lines.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

pub fn api() -> (AtomicFs<TestEmitter, TestAudit>, TestEmitter, TestAudit) {
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    (
        AtomicFs::new(facts.clone(), audit.clone(), Config::default()),
        facts,
        audit,
    )
}

/// Scratch directory removed on drop.
pub fn with_temp_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

pub fn mode_of(p: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(p).unwrap().permissions().mode() & 0o7777
}

/// Names in `dir` that start with a dot (staging files and friends).
pub fn hidden_entries(dir: &Path) -> Vec<String> {
    let mut out: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|n| n.starts_with('.'))
        .collect();
    out.sort();
    out
}
