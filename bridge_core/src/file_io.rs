//! # File I/O
//!
//! Saving and loading `.bdf` design files:
//! - **Atomic saves**: write to `.bdf.tmp`, fsync, rename over the target
//! - **Advisory locking**: an OS lock (fs2) plus a `.bdf.lock` file naming the holder
//! - **Version check**: files from a newer schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use bridge_core::file_io::{load_design, save_design, FileLock};
//! use bridge_core::project::DesignFile;
//! use std::path::Path;
//!
//! let design = DesignFile::default();
//! let path = Path::new("girder.bdf");
//!
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//! save_design(&design, path).unwrap();
//! drop(lock);
//!
//! let loaded = load_design(path).unwrap();
//! assert_eq!(loaded.meta.id, design.meta.id);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::input::InputMap;
use crate::project::{DesignFile, SCHEMA_VERSION};

/// Extension used for design files
pub const DESIGN_EXTENSION: &str = "bdf";

/// Metadata stored in `.bdf.lock` files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Held by a process that has exited on this machine, or older than a day
    pub fn is_stale(&self) -> bool {
        if hostname().is_some_and(|ours| ours == self.machine) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > 24
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    fs::metadata(format!("/proc/{pid}")).is_ok()
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    std::process::Command::new("tasklist")
        .args(["/FI", &format!("PID eq {pid}"), "/NH"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
        .unwrap_or(true)
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

fn io_error(operation: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> EngineError {
    let path = path.display().to_string();
    move |e| EngineError::file_error(operation, path, e.to_string())
}

fn serialization_error(e: serde_json::Error) -> EngineError {
    EngineError::SerializationError { reason: e.to_string() }
}

// ============================================================================
// Locking
// ============================================================================

/// Exclusive lock on a design file, released on drop.
///
/// Holds the OS lock on the `.bdf.lock` file for process safety; the JSON
/// inside tells other users who has the design open.
#[derive(Debug)]
pub struct FileLock {
    design_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a design file.
    ///
    /// # Errors
    ///
    /// `EngineError::FileLocked` if another live process holds it.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EngineResult<Self> {
        if let Some(existing) = FileLock::check(path) {
            return Err(EngineError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(io_error("create lock", &lock_path))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            EngineError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(serialization_error)?;
        lock_file.write_all(lock_json.as_bytes()).map_err(io_error("write lock", &lock_path))?;
        lock_file.sync_all().map_err(io_error("sync lock", &lock_path))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "design locked");
        Ok(FileLock {
            design_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of a live lock, if any.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).ok().filter(|info| !info.is_stale())
    }

    pub fn design_path(&self) -> &Path {
        &self.design_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `girder.bdf` -> `girder.bdf.lock`
fn lock_path_for(design_path: &Path) -> PathBuf {
    let mut lock_path = design_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> EngineResult<LockInfo> {
    let contents = fs::read_to_string(lock_path).map_err(io_error("read lock", lock_path))?;
    serde_json::from_str(&contents).map_err(serialization_error)
}

// ============================================================================
// Save / Load
// ============================================================================

/// Save a design with atomic write semantics.
///
/// The JSON goes to `<path>.tmp` first, is synced to disk, then renamed over
/// `path`. An interrupted save leaves the previous file intact.
pub fn save_design(design: &DesignFile, path: &Path) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(design).map_err(serialization_error)?;

    let tmp_path = tmp_path_for(path);
    let mut tmp_file = File::create(&tmp_path).map_err(io_error("create temp file", &tmp_path))?;
    tmp_file.write_all(json.as_bytes()).map_err(io_error("write temp file", &tmp_path))?;
    tmp_file.sync_all().map_err(io_error("sync temp file", &tmp_path))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EngineError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), id = %design.meta.id, "design saved");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

/// Load a design file.
///
/// # Errors
///
/// - `EngineError::FileError` on I/O failure
/// - `EngineError::SerializationError` for malformed JSON
/// - `EngineError::VersionMismatch` for files from an incompatible schema
pub fn load_design(path: &Path) -> EngineResult<DesignFile> {
    let contents = fs::read_to_string(path).map_err(io_error("read", path))?;
    let design: DesignFile =
        serde_json::from_str(&contents).map_err(|e| EngineError::SerializationError {
            reason: format!("Invalid design file {}: {}", path.display(), e),
        })?;
    validate_version(&design.meta.version)?;
    tracing::debug!(path = %path.display(), id = %design.meta.id, "design loaded");
    Ok(design)
}

/// Load a design along with the holder of a live lock, if any.
///
/// A locked design is still returned; callers treat it as read-only.
pub fn load_design_with_lock_check(path: &Path) -> EngineResult<(DesignFile, Option<LockInfo>)> {
    let design = load_design(path)?;
    Ok((design, FileLock::check(path)))
}

/// Read form inputs from either a `.bdf` design file or a bare JSON input map.
pub fn load_inputs(path: &Path) -> EngineResult<InputMap> {
    if path.extension().is_some_and(|e| e == DESIGN_EXTENSION) {
        return load_design(path).map(|design| design.inputs);
    }
    let contents = fs::read_to_string(path).map_err(io_error("read", path))?;
    serde_json::from_str(&contents).map_err(|e| EngineError::SerializationError {
        reason: format!("Invalid input map {}: {}", path.display(), e),
    })
}

/// Same major version; on 0.x the file's minor may not be newer than ours.
fn validate_version(file_version: &str) -> EngineResult<()> {
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(str::parse::<u32>);
        let major = parts.next()?.ok()?;
        let minor = parts.next().unwrap_or(Ok(0)).ok()?;
        Some((major, minor))
    };
    let mismatch = || EngineError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;
    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::bridge::sample_input;
    use crate::settings::EngineSettings;
    use std::env::temp_dir;

    fn temp_design_path(name: &str) -> PathBuf {
        temp_dir().join(format!("bridge_core_test_{name}.bdf"))
    }

    #[test]
    fn test_lock_path_generation() {
        assert_eq!(
            lock_path_for(Path::new("/path/to/girder.bdf")),
            Path::new("/path/to/girder.bdf.lock")
        );
        assert_eq!(lock_path_for(Path::new("girder")), Path::new("girder.lock"));
        assert_eq!(tmp_path_for(Path::new("girder.bdf")), Path::new("girder.bdf.tmp"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("test@example.com");
        assert_eq!(info.user_id, "test@example.com");
        assert!(info.pid > 0);
        assert!(!info.is_stale());
    }

    #[test]
    fn test_old_lock_is_stale() {
        let mut info = LockInfo::new("test@example.com");
        info.machine = "elsewhere".to_string();
        info.locked_at = Utc::now() - chrono::Duration::hours(30);
        assert!(info.is_stale());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_design_path("roundtrip");
        let design = DesignFile::new("Test Engineer", EngineSettings::default(), sample_input());
        save_design(&design, &path).unwrap();

        let loaded = load_design(&path).unwrap();
        assert_eq!(loaded, design);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_design_path("atomic");
        save_design(&DesignFile::default(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_design_path("lock_test");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        assert_eq!(lock.design_path(), path.as_path());
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_second_lock_is_refused() {
        let path = temp_design_path("double_lock");
        File::create(&path).unwrap();

        let _lock = FileLock::acquire(&path, "first@example.com").unwrap();
        let err = FileLock::acquire(&path, "second@example.com").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(_lock);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("latest").is_err());
    }

    #[test]
    fn test_load_rejects_newer_file() {
        let path = temp_design_path("newer");
        let mut design = DesignFile::default();
        design.meta.version = "0.9.0".to_string();
        save_design(&design, &path).unwrap();

        let err = load_design(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_design(&temp_design_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_design_path("lock_check");
        let design = DesignFile::new("Test", EngineSettings::default(), InputMap::new());
        save_design(&design, &path).unwrap();

        let (loaded, lock_info) = load_design_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_inputs_from_either_format() {
        let design_path = temp_design_path("inputs");
        let design = DesignFile::new("Test", EngineSettings::default(), sample_input());
        save_design(&design, &design_path).unwrap();
        assert_eq!(load_inputs(&design_path).unwrap(), sample_input());

        let json_path = temp_dir().join("bridge_core_test_inputs.json");
        fs::write(&json_path, serde_json::to_string(&sample_input()).unwrap()).unwrap();
        assert_eq!(load_inputs(&json_path).unwrap(), sample_input());

        fs::write(&json_path, "[1, 2, 3]").unwrap();
        assert_eq!(load_inputs(&json_path).unwrap_err().error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&design_path);
        let _ = fs::remove_file(&json_path);
    }
}
