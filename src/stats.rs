//! Stats-file ingestion
//!
//! The webpack dashboard plugin writes build stats to
//! `./node_modules/.stats-<type>.json` instead of pushing them over IPC;
//! the relay reads the blob once and deletes the file. [`StatsSource`]
//! abstracts that convention so tests never touch the real filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RelayError;
use crate::message::TaskType;

/// Source of build-stats blobs, keyed by task type
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Load and parse the stats blob for a task
    async fn load(&self, task: TaskType) -> Result<Value, RelayError>;

    /// Discard the blob after ingestion
    async fn discard(&self, task: TaskType) -> Result<(), RelayError>;
}

/// Reads `.stats-<type>.json` from `<root>/node_modules`
#[derive(Debug, Clone)]
pub struct FileStatsSource {
    root: PathBuf,
}

impl FileStatsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve relative to the current working directory
    pub fn from_cwd() -> Result<Self, RelayError> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Conventional path for a task's stats file
    pub fn stats_path(&self, task: TaskType) -> PathBuf {
        self.root
            .join("node_modules")
            .join(format!(".stats-{task}.json"))
    }

    fn stats_error(task: TaskType, path: &Path, source: std::io::Error) -> RelayError {
        RelayError::Stats {
            task,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl StatsSource for FileStatsSource {
    async fn load(&self, task: TaskType) -> Result<Value, RelayError> {
        let path = self.stats_path(task);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Self::stats_error(task, &path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn discard(&self, task: TaskType) -> Result<(), RelayError> {
        let path = self.stats_path(task);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| Self::stats_error(task, &path, e))
    }
}

/// Mock source with canned blobs, recording every call for assertions
#[derive(Debug, Default)]
pub struct MockStatsSource {
    blobs: Mutex<HashMap<TaskType, Value>>,
    loaded: Mutex<Vec<TaskType>>,
    discarded: Mutex<Vec<TaskType>>,
}

impl MockStatsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the blob `load` will return for a task
    pub fn put(&self, task: TaskType, blob: Value) {
        self.blobs.lock().unwrap().insert(task, blob);
    }

    pub fn loaded(&self) -> Vec<TaskType> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn discarded(&self) -> Vec<TaskType> {
        self.discarded.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsSource for MockStatsSource {
    async fn load(&self, task: TaskType) -> Result<Value, RelayError> {
        self.loaded.lock().unwrap().push(task);
        self.blobs
            .lock()
            .unwrap()
            .get(&task)
            .cloned()
            .ok_or_else(|| RelayError::Stats {
                task,
                path: PathBuf::from(format!(".stats-{task}.json")),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no blob queued"),
            })
    }

    async fn discard(&self, task: TaskType) -> Result<(), RelayError> {
        self.discarded.lock().unwrap().push(task);
        self.blobs.lock().unwrap().remove(&task);
        Ok(())
    }
}
