// Mock test helpers and common mock patterns
//
// Reusable mock constructors with sensible defaults, plus a tracing layer that
// counts log events so tests can assert nothing was logged at warn/error.
//
// Usage:
//     use crate::services::mocks::test_helpers::*;
//     let logs = LogCapture::new();
//     let _guard = logs.install();
//     ...
//     assert!(!logs.has_warnings_or_errors());

#[cfg(test)]
pub mod test_helpers {
    use super::super::traits::*;
    use crate::error::ConfigError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts log events by severity while installed
    #[derive(Clone, Default)]
    pub struct LogCapture {
        warnings: Arc<AtomicUsize>,
        errors: Arc<AtomicUsize>,
    }

    impl LogCapture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Install as the thread's default subscriber until the guard drops
        pub fn install(&self) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::registry().with(self.clone());
            tracing::subscriber::set_default(subscriber)
        }

        pub fn error_count(&self) -> usize {
            self.errors.load(Ordering::SeqCst)
        }

        pub fn warning_count(&self) -> usize {
            self.warnings.load(Ordering::SeqCst)
        }

        pub fn has_warnings_or_errors(&self) -> bool {
            self.error_count() + self.warning_count() > 0
        }
    }

    impl<S: Subscriber> Layer<S> for LogCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let level = *event.metadata().level();
            if level == Level::ERROR {
                self.errors.fetch_add(1, Ordering::SeqCst);
            } else if level == Level::WARN {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Create a mock filesystem with default "nothing exists" behavior
    ///
    /// Default behavior:
    /// - exists() and is_file() return false
    /// - create_dir_all() succeeds
    pub fn create_mock_filesystem() -> MockFileSystem {
        let mut mock = MockFileSystem::new();

        mock.expect_exists().returning(|_| false);
        mock.expect_is_file().returning(|_| false);
        mock.expect_create_dir_all().returning(|_| Ok(()));

        mock
    }

    /// Create a mock storage that holds no files and accepts writes
    ///
    /// Default behavior:
    /// - file_exists() returns false
    /// - write_to_file() succeeds
    /// - get_file_names() returns empty vec
    pub fn create_mock_storage() -> MockStorageService {
        let mut mock = MockStorageService::new();

        mock.expect_file_exists().returning(|_| false);
        mock.expect_write_to_file().returning(|_, _| Ok(()));
        mock.expect_get_file_names().returning(|| Ok(vec![]));

        mock
    }

    /// Create a mock storage whose every operation fails
    pub fn create_failing_storage() -> MockStorageService {
        let mut mock = MockStorageService::new();

        mock.expect_file_exists().returning(|_| true);
        mock.expect_read_file()
            .returning(|_| Err(ConfigError::StorageError("read failed".to_string())));
        mock.expect_write_to_file()
            .returning(|_, _| Err(ConfigError::StorageError("write failed".to_string())));
        mock.expect_delete_file()
            .returning(|_| Err(ConfigError::StorageError("delete failed".to_string())));
        mock.expect_get_file_names()
            .returning(|| Err(ConfigError::StorageError("listing failed".to_string())));

        mock
    }
}

#[cfg(test)]
mod tests {
    use super::super::traits::*;
    use super::test_helpers::*;
    use std::path::Path;

    #[tokio::test]
    async fn test_create_mock_filesystem() {
        let mock = create_mock_filesystem();
        assert!(!mock.exists(Path::new("/cfg")).await);
        assert!(mock.create_dir_all(Path::new("/cfg")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_mock_storage() {
        let mock = create_mock_storage();
        assert!(!mock.file_exists("mako-a.cfg").await);
        assert!(mock.write_to_file("mako-a.cfg", "{}").await.is_ok());
        assert!(mock.get_file_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_failing_storage() {
        let mock = create_failing_storage();
        assert!(mock.read_file("mako-a.cfg").await.is_err());
        assert!(mock.write_to_file("mako-a.cfg", "{}").await.is_err());
        assert!(mock.delete_file("mako-a.cfg").await.is_err());
        assert!(mock.get_file_names().await.is_err());
    }

    #[test]
    fn test_log_capture_counts_levels() {
        let logs = LogCapture::new();
        {
            let _guard = logs.install();
            tracing::info!("ignored");
            tracing::warn!("warned");
            tracing::error!("failed");
        }
        tracing::error!("after guard dropped");

        assert_eq!(logs.warning_count(), 1);
        assert_eq!(logs.error_count(), 1);
        assert!(logs.has_warnings_or_errors());
    }
}
