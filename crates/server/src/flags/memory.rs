//! In-process flag document, for tests and embedding.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use toggle_checkout_core::FeatureFlags;

use super::{FlagSource, FlagSourceError};

/// Holds a flag document in memory.
///
/// The document can be replaced at any time; the next fetch sees the new
/// value.
#[derive(Debug, Default)]
pub struct InMemoryFlagSource {
    document: RwLock<Option<String>>,
    delay: Option<Duration>,
}

impl InMemoryFlagSource {
    /// Create a source serving `document`.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Some(document.into())),
            delay: None,
        }
    }

    /// Create a source serving the given flag values.
    #[must_use]
    pub fn with_flags(flags: FeatureFlags) -> Self {
        let source = Self::default();
        source.set_flags(flags);
        source
    }

    /// Create a source that fails every fetch.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Wait `delay` before answering each fetch.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the raw document.
    pub fn set_document(&self, document: impl Into<String>) {
        if let Ok(mut guard) = self.document.write() {
            *guard = Some(document.into());
        }
    }

    /// Replace the document with the given flag values.
    pub fn set_flags(&self, flags: FeatureFlags) {
        if let Ok(document) = serde_json::to_string(&flags) {
            self.set_document(document);
        }
    }

    /// Drop the document so fetches fail.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.document.write() {
            *guard = None;
        }
    }
}

#[async_trait]
impl FlagSource for InMemoryFlagSource {
    async fn fetch(&self) -> Result<String, FlagSourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.document
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| FlagSourceError::Unavailable(self.describe()))
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
