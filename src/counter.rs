//! File-backed request counter.
//!
//! The whole read-parse-increment-write sequence runs under one async mutex,
//! so concurrent callers observe a gap-free, strictly increasing sequence.
//! Replicas each keep their own file; nothing coordinates across processes.

use std::io;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};

/// Name of the counter file inside the state directory.
pub const COUNT_FILE: &str = "count";

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("reading {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("parsing {}: {content:?} is not a counter value", path.display())]
    Parse { path: PathBuf, content: String },

    #[error("{} already holds the largest counter value", path.display())]
    Overflow { path: PathBuf },

    #[error("writing {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug)]
pub struct CounterStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CounterStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(COUNT_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Increments the persisted value and returns the new one.
    ///
    /// A missing or empty file counts as zero. Content that is not exactly a
    /// decimal number, or a value that cannot be incremented, fails without
    /// touching the file. The write is a plain overwrite.
    pub async fn increment_and_get(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().await;

        let current = match fs::read(&self.path).await {
            Ok(raw) => parse_count(&raw).ok_or_else(|| CounterError::Parse {
                path: self.path.clone(),
                content: String::from_utf8_lossy(&raw).into_owned(),
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(source) => {
                return Err(CounterError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let next = current.checked_add(1).ok_or_else(|| CounterError::Overflow {
            path: self.path.clone(),
        })?;
        fs::write(&self.path, next.to_string())
            .await
            .map_err(|source| CounterError::Write {
                path: self.path.clone(),
                source,
            })?;

        Ok(next)
    }
}

fn parse_count(raw: &[u8]) -> Option<u64> {
    if raw.is_empty() {
        return Some(0);
    }
    std::str::from_utf8(raw).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_starts_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CounterStore::new(dir.path());
        assert_eq!(store.increment_and_get().await.unwrap(), 1);
        assert_eq!(store.increment_and_get().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "2");
    }

    #[tokio::test]
    async fn test_empty_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COUNT_FILE), "").unwrap();
        let store = CounterStore::new(dir.path());
        assert_eq!(store.increment_and_get().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_continues_existing_value() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COUNT_FILE), "41").unwrap();
        let store = CounterStore::new(dir.path());
        assert_eq!(store.increment_and_get().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_padded_value_is_rejected() {
        for content in ["41\n", " 41 \n", "\n", "  "] {
            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join(COUNT_FILE);
            std::fs::write(&file, content).unwrap();
            let store = CounterStore::new(dir.path());

            let result = store.increment_and_get().await;
            assert!(
                matches!(result, Err(CounterError::Parse { .. })),
                "{content:?} gave {result:?}"
            );
            assert_eq!(std::fs::read_to_string(&file).unwrap(), content);
        }
    }

    #[tokio::test]
    async fn test_largest_value_is_not_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(COUNT_FILE);
        std::fs::write(&file, u64::MAX.to_string()).unwrap();
        let store = CounterStore::new(dir.path());

        assert!(matches!(
            store.increment_and_get().await,
            Err(CounterError::Overflow { .. })
        ));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), u64::MAX.to_string());
    }

    #[tokio::test]
    async fn test_garbage_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(COUNT_FILE);
        std::fs::write(&file, "not a number").unwrap();
        let store = CounterStore::new(dir.path());

        let err = store.increment_and_get().await.unwrap_err();
        assert!(matches!(err, CounterError::Parse { .. }));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "not a number");
    }

    #[tokio::test]
    async fn test_negative_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COUNT_FILE), "-3").unwrap();
        let store = CounterStore::new(dir.path());
        assert!(matches!(
            store.increment_and_get().await,
            Err(CounterError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_state_dir_fails_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = CounterStore::new(dir.path().join("absent"));
        assert!(matches!(
            store.increment_and_get().await,
            Err(CounterError::Write { .. })
        ));
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_fails_on_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(COUNT_FILE)).unwrap();
        let store = CounterStore::new(dir.path());
        assert!(matches!(
            store.increment_and_get().await,
            Err(CounterError::Read { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_gap_free() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CounterStore::new(dir.path()));

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment_and_get().await.unwrap() })
            })
            .collect();

        let mut seen = Vec::new();
        for task in tasks {
            seen.push(task.await.unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=50).collect::<Vec<u64>>());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "50");
    }
}
