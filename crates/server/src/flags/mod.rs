//! Feature flag loading.
//!
//! Flags are read through a [`FlagSource`] on every call to
//! [`FlagStore::load`]; nothing is cached between requests, so flipping a
//! flag takes effect on the very next checkout.
//!
//! # Failure Handling
//!
//! Loading never fails. A source error, a malformed document or a read that
//! outlives the configured timeout all produce [`FeatureFlags::default`]
//! (every flag off) plus a warning. A broken configuration can therefore
//! only ever switch features off.

pub mod file;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use toggle_checkout_core::{FeatureFlags, FlagDocumentError};

pub use file::FileFlagSource;
pub use memory::InMemoryFlagSource;

/// Errors a flag source can report.
#[derive(Debug, Error)]
pub enum FlagSourceError {
    /// The backing document could not be read.
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    /// The source has no document to offer.
    #[error("flag source unavailable: {0}")]
    Unavailable(String),
}

/// Why a flag load fell back to defaults.
#[derive(Debug, Error)]
pub enum FlagLoadError {
    #[error(transparent)]
    Source(#[from] FlagSourceError),
    #[error(transparent)]
    Document(#[from] FlagDocumentError),
    #[error("flag source did not answer within {0:?}")]
    Timeout(Duration),
}

/// Somewhere a flag document can be fetched from.
///
/// Implementations return the raw document; parsing and fallback are handled
/// by [`FlagStore`].
#[async_trait]
pub trait FlagSource: Send + Sync {
    /// Fetch the current flag document.
    async fn fetch(&self) -> Result<String, FlagSourceError>;

    /// Short description used in log messages (a path, a URL, ...).
    fn describe(&self) -> String;
}

/// Loads [`FeatureFlags`] from a [`FlagSource`] with a bounded wait.
#[derive(Clone)]
pub struct FlagStore {
    source: Arc<dyn FlagSource>,
    timeout: Duration,
}

impl FlagStore {
    /// Create a store reading from `source`, giving up after `timeout`.
    #[must_use]
    pub fn new(source: Arc<dyn FlagSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Load the current flags, falling back to all-off on any failure.
    pub async fn load(&self) -> FeatureFlags {
        match self.try_load().await {
            Ok(flags) => flags,
            Err(e) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "Using default feature flags"
                );
                FeatureFlags::default()
            }
        }
    }

    /// Load the current flags, reporting why a load failed.
    ///
    /// # Errors
    ///
    /// Returns `FlagLoadError` if the source fails, times out, or returns a
    /// malformed document.
    pub async fn try_load(&self) -> Result<FeatureFlags, FlagLoadError> {
        let document = tokio::time::timeout(self.timeout, self.source.fetch())
            .await
            .map_err(|_| FlagLoadError::Timeout(self.timeout))??;

        Ok(FeatureFlags::from_json(&document)?)
    }
}
