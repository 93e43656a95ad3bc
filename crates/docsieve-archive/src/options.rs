use std::sync::Arc;

use docsieve_diag::{Diagnostics, TracingDiagnostics};

use crate::names::NameDecoding;

/// Settings shared by listing, extraction and creation.
#[derive(Clone)]
pub struct ArchiveOptions {
    pub password: Option<String>,
    pub names: NameDecoding,
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            password: None,
            names: NameDecoding::cp437_only(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl ArchiveOptions {
    /// Defaults plus the host locale for legacy names.
    pub fn from_locale() -> Self {
        Self::default().names(NameDecoding::from_locale())
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn maybe_password(mut self, password: Option<&str>) -> Self {
        self.password = password.map(str::to_owned);
        self
    }

    pub fn names(mut self, names: NameDecoding) -> Self {
        self.names = names;
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}
