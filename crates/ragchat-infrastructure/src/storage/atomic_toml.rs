//! Crash-safe TOML files.
//!
//! Writes go to a sibling temp file that is fsynced and renamed over the
//! target, so readers see either the old or the new content. Writers hold an
//! exclusive lock on a `.lock` sibling, since they share the temp path.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use ragchat_core::RagchatError;
use ragchat_core::error::Result;
use serde::{Serialize, de::DeserializeOwned};

/// Handle to a TOML file holding one `T`.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn save(&self, data: &T) -> Result<()> {
        let parent = self.parent_dir()?;
        fs::create_dir_all(parent)?;
        let _lock = FileLock::acquire(&self.path)?;

        let body = toml::to_string_pretty(data)?;
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(body.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn parent_dir(&self) -> Result<&Path> {
        self.path
            .parent()
            .ok_or_else(|| RagchatError::io(format!("{} has no parent", self.path.display())))
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| RagchatError::io(format!("{} has no file name", self.path.display())))?;
        Ok(self
            .parent_dir()?
            .join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock, released when the handle is closed on drop.
///
/// The lock file itself stays on disk: unlinking it would let a waiting
/// writer hold a lock on a file nobody else opens any more.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| RagchatError::io(format!("Failed to lock {}: {e}", lock_path.display())))?;

        Ok(Self { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_missing_and_blank_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "   \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("counter.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        let value = Counter {
            name: "a".to_string(),
            count: 3,
        };
        file.save(&value).unwrap();

        assert_eq!(file.load().unwrap(), Some(value));
        assert!(!path.with_file_name(".counter.toml.tmp").exists());
    }

    #[test]
    fn test_concurrent_saves_leave_a_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");

        let writers: Vec<_> = (0..8u32)
            .map(|writer| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let file = AtomicTomlFile::<Counter>::new(path);
                    for round in 0..20u32 {
                        let value = Counter {
                            name: format!("writer-{writer}"),
                            count: writer * 100 + round,
                        };
                        file.save(&value).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let stored = AtomicTomlFile::<Counter>::new(path.clone())
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, format!("writer-{}", stored.count / 100));
        assert!(!path.with_file_name(".counter.toml.tmp").exists());
        // Kept so every writer locks the same file.
        assert!(temp_dir.path().join("counter.lock").exists());
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        fs::write(&path, "count = [").unwrap();

        let err = AtomicTomlFile::<Counter>::new(path).load().unwrap_err();
        assert!(matches!(err, RagchatError::Serialization { .. }));
    }
}
