//! Diagnostics sink for identification, decoding and archive work.
//!
//! Library code never talks to a global logger directly. It emits
//! [`Diagnostic`] records into a [`Diagnostics`] implementation that the
//! caller hands in. [`TracingDiagnostics`] forwards to `tracing`,
//! [`MemoryDiagnostics`] keeps records for assertions in tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Notice,
    Warning,
    Error,
}

/// Pipeline stage a diagnostic was raised from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Identification,
    EncodingDetection,
    Dispatch,
    Decode,
    Materialize,
    Archive,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identification => "identification",
            Self::EncodingDetection => "encoding-detection",
            Self::Dispatch => "dispatch",
            Self::Decode => "decode",
            Self::Materialize => "materialize",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity,
            stage,
            path: None,
            message: message.into(),
        }
    }

    pub fn debug(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Debug, stage, message)
    }

    pub fn notice(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Notice, stage, message)
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, stage, message)
    }

    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, stage, message)
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Receiver for [`Diagnostic`] records.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<D: Diagnostics + ?Sized> Diagnostics for Arc<D> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Forwards every record to the `tracing` macros, one level per severity.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, d: Diagnostic) {
        let stage = d.stage.as_str();
        let path = d.path.as_deref().map(Path::display);
        match d.severity {
            Severity::Debug => tracing::debug!(stage, path = ?path, "{}", d.message),
            Severity::Notice => tracing::info!(stage, path = ?path, "{}", d.message),
            Severity::Warning => tracing::warn!(stage, path = ?path, "{}", d.message),
            Severity::Error => tracing::error!(stage, path = ?path, "{}", d.message),
        }
    }
}

/// Buffers records in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, severity: Severity, stage: Stage) -> usize {
        self.records()
            .iter()
            .filter(|d| d.severity == severity && d.stage == stage)
            .count()
    }

    pub fn contains(&self, stage: Stage, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|d| d.stage == stage && d.message.contains(needle))
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.records.lock() {
            Ok(mut records) => records.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
