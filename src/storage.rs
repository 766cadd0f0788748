//! Snapshot persistence
//!
//! The store hands each collection to a [`SnapshotStore`] as one opaque
//! string blob under a fixed key. Adapters own the storage mechanism; the
//! store only serializes and deserializes.

use crate::git_ops::GitOps;
use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the subject collection (tasks are nested inside)
pub const SUBJECTS_KEY: &str = "studentPlannerData";
/// Key of the event collection
pub const EVENTS_KEY: &str = "studentPlannerEvents";
/// Key of the focus-session collection
pub const FOCUS_SESSIONS_KEY: &str = "focusSessions";

/// Get/set of named string blobs
pub trait SnapshotStore {
    /// Return the blob saved under `key`, or `None` if nothing was saved yet
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob saved under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store backed by a map
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    blobs: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `save` fails
    pub fn failing() -> Self {
        Self {
            blobs: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn with_blob(mut self, key: &str, value: impl Into<String>) -> Self {
        self.blobs.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl SnapshotStore for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            bail!("write to '{}' rejected", key);
        }
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory
///
/// With git versioning enabled and the directory inside a repository, every
/// save also commits the written file.
pub struct FileStorage {
    dir: PathBuf,
    git_ops: Option<GitOps>,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>, sync_git: bool) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let git_ops = if sync_git {
            let ops = GitOps::new(&dir);
            if !ops.is_git_managed() {
                log::warn!(
                    "git versioning requested but {} is not inside a git repository",
                    dir.display()
                );
            }
            Some(ops)
        } else {
            None
        };
        Self { dir, git_ops }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))?;

        if let Some(git_ops) = &self.git_ops {
            git_ops
                .commit(&path, &format!("Update {}", key))
                .context("Failed to commit snapshot")?;
        }
        Ok(())
    }
}
