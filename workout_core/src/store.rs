//! Saved plan persistence with file locking.
//!
//! Each user's saved plan lives in its own JSON document under the store
//! directory, next to a `<user>.lock` file that is never replaced. Every
//! operation on a user's plan locks that file: shared for reads, exclusive
//! for writes. `update` holds the exclusive lock across the whole
//! read-modify-write, so concurrent `wplan check` processes cannot drop each
//! other's marks. Documents are written to a temp file and renamed over the
//! previous one.

use crate::{Error, Result, SavedPlan};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage for saved plans keyed by an opaque user id
pub trait PlanStore {
    /// Load the user's saved plan, `None` if there is none
    fn load(&self, user_id: &str) -> Result<Option<SavedPlan>>;

    /// Save the user's plan, replacing any previous one
    fn save(&self, user_id: &str, plan: &SavedPlan) -> Result<()>;

    /// Remove the user's saved plan, returning whether one existed
    fn remove(&self, user_id: &str) -> Result<bool>;
}

/// One pretty-printed JSON file per user
pub struct JsonPlanStore {
    dir: PathBuf,
}

/// Held lock on a user's lock file, released on drop
struct UserLock {
    file: File,
}

impl Drop for UserLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl JsonPlanStore {
    /// Create a store rooted at `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document holding a user's plan
    pub fn plan_path(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.dir.join(format!("{}.json", user_id)))
    }

    /// Path of the file locked around every access to a user's plan
    pub fn lock_path(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.dir.join(format!("{}.lock", user_id)))
    }

    /// Load the user's plan, modify it, and save it back
    ///
    /// The user's exclusive lock is held from the read until the new document
    /// is in place, so concurrent updates are applied one after another.
    /// Fails with [`Error::NoSavedPlan`] when the user has nothing saved.
    pub fn update<F>(&self, user_id: &str, f: F) -> Result<SavedPlan>
    where
        F: FnOnce(&mut SavedPlan) -> Result<()>,
    {
        let path = self.plan_path(user_id)?;
        let _lock = self.lock_user(user_id, true)?;

        let mut saved = read_document(&path)
            .ok_or_else(|| Error::NoSavedPlan(user_id.to_string()))?;
        f(&mut saved)?;
        self.write_document(&path, &saved)?;

        tracing::debug!("Updated saved plan for {:?}", user_id);
        Ok(saved)
    }

    fn lock_user(&self, user_id: &str, exclusive: bool) -> Result<UserLock> {
        let path = self.lock_path(user_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        Ok(UserLock { file })
    }

    /// Callers must hold the user's exclusive lock
    fn write_document(&self, path: &Path, plan: &SavedPlan) -> Result<()> {
        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(&self.dir)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, plan)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl PlanStore for JsonPlanStore {
    /// Unreadable or corrupted documents are logged and treated as absent.
    fn load(&self, user_id: &str) -> Result<Option<SavedPlan>> {
        let path = self.plan_path(user_id)?;
        if !path.exists() {
            tracing::debug!("No saved plan for {:?} at {:?}", user_id, path);
            return Ok(None);
        }

        let _lock = self.lock_user(user_id, false)?;
        let saved = read_document(&path);
        if saved.is_some() {
            tracing::debug!("Loaded saved plan for {:?} from {:?}", user_id, path);
        }
        Ok(saved)
    }

    fn save(&self, user_id: &str, plan: &SavedPlan) -> Result<()> {
        let path = self.plan_path(user_id)?;
        let _lock = self.lock_user(user_id, true)?;
        self.write_document(&path, plan)?;

        tracing::info!("Saved plan {:?} for {:?}", plan.plan.title, user_id);
        Ok(())
    }

    /// The lock file stays behind so waiting processes keep locking the same inode.
    fn remove(&self, user_id: &str) -> Result<bool> {
        let path = self.plan_path(user_id)?;
        if !path.exists() {
            return Ok(false);
        }

        let _lock = self.lock_user(user_id, true)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Removed saved plan for {:?}", user_id);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Read and decode a plan document, `None` when it is missing or unusable
fn read_document(path: &Path) -> Option<SavedPlan> {
    let mut contents = String::new();
    match File::open(path) {
        Ok(file) => {
            let mut reader = std::io::BufReader::new(file);
            if let Err(e) = reader.read_to_string(&mut contents) {
                tracing::warn!("Failed to read saved plan {:?}: {}. Ignoring it.", path, e);
                return None;
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Unable to open saved plan {:?}: {}. Ignoring it.", path, e);
            return None;
        }
    }

    match serde_json::from_str::<SavedPlan>(&contents) {
        Ok(saved) => Some(saved),
        Err(e) => {
            tracing::warn!("Failed to parse saved plan {:?}: {}. Ignoring it.", path, e);
            None
        }
    }
}

/// User ids become file names, so only a conservative character set is allowed
fn validate_user_id(user_id: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@');
    if user_id.is_empty() || user_id.starts_with('.') || !user_id.chars().all(allowed) {
        return Err(Error::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}
