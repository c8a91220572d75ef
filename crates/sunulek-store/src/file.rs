//! Session record on disk.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use fs2::FileExt;
use tracing::{debug, warn};
use uuid::Uuid;

use sunulek_core::Result;
use sunulek_core::error::{Error, InvalidInputError, StorageError};
use sunulek_core::{Session, SessionStore, StoredSession};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(path: &Path, err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Stores the session as `<dir>/<namespace>.json`.
///
/// Writes go to a temporary file that is renamed over the record, under
/// an exclusive lock on `<dir>/<namespace>.lock`, so concurrent processes
/// never observe a partial record.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
    namespace: String,
}

impl FileSessionStore {
    /// A store in `dir` under the given namespace.
    pub fn new(dir: impl AsRef<Path>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            namespace: namespace.into(),
        }
    }

    /// A store in the per-user data directory
    /// (e.g. `~/.local/share/sunulek` on Linux).
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn default_location(namespace: impl Into<String>) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "sunulek").ok_or_else(|| {
            Error::InvalidInput(InvalidInputError::Other {
                message: "could not determine the user data directory".to_string(),
            })
        })?;
        Ok(Self::new(dirs.data_dir(), namespace))
    }

    /// Path of the session record.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.namespace))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.lock", self.namespace))
    }

    /// Run `f` while holding the exclusive lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(&self.dir).map_err(|e| map_io(&self.dir, e))?;

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| map_io(&lock_path, e))?;
        let result = f();
        lock_file.unlock().map_err(|e| map_io(&lock_path, e))?;

        result
    }

    fn write_record(&self, content: &str) -> Result<()> {
        let path = self.path();
        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", self.namespace, Uuid::new_v4().simple()));

        let mut options = OpenOptions::new();
        options.create_new(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let written = options.open(&temp_path).and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_data()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(map_io(&temp_path, e));
        }

        #[cfg(unix)]
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
            .map_err(|e| map_io(&temp_path, e))?;

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            map_io(&path, e)
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<StoredSession> {
        let path = self.path();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read stored session");
                return None;
            }
        };

        let stored: StoredSession = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed stored session");
                return None;
            }
        };

        // Only hand back records that make a usable session.
        if let Err(e) = Session::try_from(stored.clone()) {
            warn!(path = %path.display(), error = %e, "Ignoring incomplete stored session");
            return None;
        }

        debug!(path = %path.display(), "Loaded stored session");
        Some(stored)
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        let content = serde_json::to_string_pretty(session).map_err(|e| {
            Error::Storage(StorageError::Encode {
                message: e.to_string(),
            })
        })?;

        self.with_lock(|| self.write_record(&content))?;
        debug!(path = %self.path().display(), "Saved session");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        self.with_lock(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&path, e)),
        })?;
        debug!(path = %path.display(), "Cleared stored session");
        Ok(())
    }
}
