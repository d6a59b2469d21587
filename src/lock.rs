//! Single-instance lock file.
//!
//! The file is opened without truncation so a second instance cannot wipe the
//! PID of the running one before discovering the lock is held. The PID is only
//! written once the exclusive lock has been acquired.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::logger::Log;

/// Default lock path: `$XDG_RUNTIME_DIR/sunzones.lock`, falling back to `/tmp`.
pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    Path::new(&runtime_dir).join("sunzones.lock")
}

/// An acquired lock. Released and removed by [`InstanceLock::release`].
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Take the exclusive lock at `path` and record our PID in it.
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Failed to open lock file {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            let holder = std::fs::read_to_string(path).unwrap_or_default();
            match holder.trim().parse::<u32>() {
                Ok(pid) => anyhow::bail!(
                    "Another instance of sunzones is already running (PID {})",
                    pid
                ),
                Err(_) => anyhow::bail!("Another instance of sunzones is already running"),
            }
        }

        write_pid(&mut file)
            .with_context(|| format!("Failed to write PID to {}", path.display()))?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unlock and delete the lock file. Failures are logged, not returned.
    pub fn release(self) {
        let Self { file, path } = self;
        let _ = FileExt::unlock(&file);
        drop(file);

        match std::fs::remove_file(&path) {
            Ok(()) => Log::log_decorated("Lock file removed"),
            Err(e) => Log::log_warning(&format!("Failed to remove lock file: {}", e)),
        }
    }
}

fn write_pid(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_acquire_writes_pid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunzones.lock");

        let lock = InstanceLock::acquire(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());
        assert_eq!(lock.path(), path.as_path());

        lock.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_second_acquire_fails_and_keeps_pid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunzones.lock");

        let first = InstanceLock::acquire(&path).unwrap();
        let err = InstanceLock::acquire(&path).unwrap_err();
        assert!(err.to_string().contains("already running"));
        assert!(err.to_string().contains(&std::process::id().to_string()));

        // The failed attempt must not have truncated the holder's PID
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());

        first.release();
    }

    #[test]
    fn test_stale_file_is_reused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunzones.lock");
        std::fs::write(&path, "999999\nleftover line\n").unwrap();

        let lock = InstanceLock::acquire(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", std::process::id()));
        lock.release();
    }

    #[test]
    #[serial]
    fn test_default_lock_path_uses_runtime_dir() {
        let original = std::env::var("XDG_RUNTIME_DIR").ok();

        unsafe {
            std::env::set_var("XDG_RUNTIME_DIR", "/run/user/4242");
        }
        assert_eq!(default_lock_path(), PathBuf::from("/run/user/4242/sunzones.lock"));

        unsafe {
            std::env::remove_var("XDG_RUNTIME_DIR");
        }
        assert_eq!(default_lock_path(), PathBuf::from("/tmp/sunzones.lock"));

        unsafe {
            match original {
                Some(value) => std::env::set_var("XDG_RUNTIME_DIR", value),
                None => std::env::remove_var("XDG_RUNTIME_DIR"),
            }
        }
    }
}
