// Copyright 2025 sftpsync contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-operation outcome events.
//!
//! Every component reports through a [`Reporter`] passed explicitly down
//! the call chain, so tests can capture events instead of scraping a log
//! file. The log is the sole record of per-item outcomes; reporting must
//! never fail the operation being reported.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Mutex;

/// Severity of a transfer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Successful operations and session milestones
    Info,
    /// Tolerated failures, e.g. a directory that could not be created
    Warning,
    /// Per-file transfer failures
    Error,
    /// Unrecoverable run-level failures
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warning => write!(f, "WARNING"),
            Level::Error => write!(f, "ERROR"),
            Level::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One recorded outcome. Append-only; never mutated after creation.
#[derive(Debug, Clone)]
pub struct TransferEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
}

/// Sink for transfer outcomes. Implementations must not panic and must
/// not block beyond what their underlying sink requires.
pub trait Reporter: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Production reporter: forwards events to the `tracing` subscriber.
///
/// `tracing` has no level above error, so critical events are emitted as
/// errors tagged with a `critical` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{message}"),
            Level::Warning => tracing::warn!("{message}"),
            Level::Error => tracing::error!("{message}"),
            Level::Critical => tracing::error!(critical = true, "{message}"),
        }
    }
}

/// Test reporter that retains every event in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<TransferEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far, in order.
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events.lock().expect("reporter lock poisoned").clone()
    }

    /// Number of recorded events at the given level.
    pub fn count(&self, level: Level) -> usize {
        self.events
            .lock()
            .expect("reporter lock poisoned")
            .iter()
            .filter(|event| event.level == level)
            .count()
    }

    /// Messages of recorded events at the given level, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .expect("reporter lock poisoned")
            .iter()
            .filter(|event| event.level == level)
            .map(|event| event.message.clone())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn log(&self, level: Level, message: &str) {
        self.events
            .lock()
            .expect("reporter lock poisoned")
            .push(TransferEvent {
                timestamp: Utc::now(),
                level,
                message: message.to_string(),
            });
    }
}
