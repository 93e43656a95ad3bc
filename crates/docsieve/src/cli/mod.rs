pub mod app;
pub mod document;
pub mod sheet;
pub mod zip;

use docsieve_archive::{ArchiveOptions, NameDecoding};
use docsieve_extract::Extractor;
use tracing::warn;

use crate::config::Config;

/// Per-invocation state shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn extractor(&self) -> Extractor {
        match &self.config.extract.scratch_dir {
            Some(dir) => Extractor::new().scratch_dir(dir),
            None => Extractor::new(),
        }
    }

    /// Archive options for one command; `label` overrides the configured
    /// name encoding, which overrides the locale.
    pub fn archive_options(&self, label: Option<&str>, password: Option<&str>) -> ArchiveOptions {
        let label = label.or(self.config.archive.name_encoding.as_deref());
        let options = match label {
            Some(label) => {
                let names = NameDecoding::with_encoding(label);
                if names.locale().is_none() {
                    warn!(label, "unknown name encoding, legacy names stay CP437");
                }
                ArchiveOptions::default().names(names)
            }
            None => ArchiveOptions::from_locale(),
        };
        options.maybe_password(password)
    }
}
