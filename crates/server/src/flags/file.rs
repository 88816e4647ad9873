//! Flag document on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{FlagSource, FlagSourceError};

/// Reads the flag document from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileFlagSource {
    path: PathBuf,
}

impl FileFlagSource {
    /// Create a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the flag document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FlagSource for FileFlagSource {
    async fn fetch(&self) -> Result<String, FlagSourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FlagSourceError::Io {
                location: self.describe(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    use toggle_checkout_core::FeatureFlags;

    use super::*;
    use crate::flags::FlagStore;

    fn store_for(path: &Path) -> FlagStore {
        FlagStore::new(
            Arc::new(FileFlagSource::new(path)),
            Duration::from_millis(500),
        )
    }

    #[tokio::test]
    async fn test_reads_flag_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"enable_cod": true, "enable_free_shipping_nudge": true}}"#
        )
        .unwrap();

        let flags = store_for(file.path()).load().await;
        assert!(flags.enable_cod);
        assert!(flags.enable_free_shipping_nudge);
    }

    #[tokio::test]
    async fn test_missing_file_defaults_all_off() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_for(&dir.path().join("toggles.json"));

        assert_eq!(store.load().await, FeatureFlags::default());
        assert!(store.try_load().await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_syntax_defaults_all_off() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "enable_cod = true").unwrap();

        assert_eq!(store_for(file.path()).load().await, FeatureFlags::default());
    }

    #[tokio::test]
    async fn test_file_changes_apply_on_next_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toggles.json");
        let store = store_for(&path);

        std::fs::write(&path, r#"{"enable_cod": true}"#).unwrap();
        assert!(store.load().await.enable_cod);

        std::fs::write(&path, r#"{"enable_cod": false}"#).unwrap();
        assert!(!store.load().await.enable_cod);
    }

    #[test]
    fn test_describe_is_path() {
        let source = FileFlagSource::new("/etc/checkout/toggles.json");
        assert_eq!(source.describe(), "/etc/checkout/toggles.json");
    }
}
