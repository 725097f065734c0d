//! Diagnostics sink.
//!
//! The controller reports two kinds of things: problems the user should be
//! told about (an unresolvable keyboard, a keyboard that failed to activate)
//! and field-diagnostics events such as which adaptors are in use.

use std::sync::Mutex;
use tracing::{info, warn};

pub trait Reporter: Send + Sync {
    /// Tell the user about a problem. The controller de-duplicates calls.
    fn notify_user_of_problem(&self, message: &str);

    /// Append an entry to the event log.
    fn write_event(&self, message: &str);

    /// Record a property attached to error reports.
    fn add_property(&self, key: &str, value: &str);
}

/// Default reporter: everything goes to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn notify_user_of_problem(&self, message: &str) {
        warn!(target: "keyboarding::user", "{}", message);
    }

    fn write_event(&self, message: &str) {
        info!(target: "keyboarding::event", "{}", message);
    }

    fn add_property(&self, key: &str, value: &str) {
        info!(target: "keyboarding::event", key, value, "error report property");
    }
}

/// Reporter that keeps everything in memory. Used by tests and by front-ends
/// that show problems themselves.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    inner: Mutex<Recorded>,
}

#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub problems: Vec<String>,
    pub events: Vec<String>,
    pub properties: Vec<(String, String)>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Recorded {
        self.inner.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn problems(&self) -> Vec<String> {
        self.snapshot().problems
    }

    pub fn events(&self) -> Vec<String> {
        self.snapshot().events
    }

    /// Most recent value recorded for `key`.
    pub fn property(&self, key: &str) -> Option<String> {
        self.snapshot()
            .properties
            .into_iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl Reporter for MemoryReporter {
    fn notify_user_of_problem(&self, message: &str) {
        if let Ok(mut r) = self.inner.lock() {
            r.problems.push(message.to_string());
        }
    }

    fn write_event(&self, message: &str) {
        if let Ok(mut r) = self.inner.lock() {
            r.events.push(message.to_string());
        }
    }

    fn add_property(&self, key: &str, value: &str) {
        if let Ok(mut r) = self.inner.lock() {
            r.properties.push((key.to_string(), value.to_string()));
        }
    }
}
