//! Idempotent directory creation.

use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

/// Ensure `dir` and any missing ancestors exist, creating each with `mode`
/// (subject to umask).
///
/// Returns `Ok(true)` if anything was created, `Ok(false)` if the whole path
/// was already there. A concurrent creator winning the race counts as "already
/// there". An empty path means the current directory.
///
/// # Errors
///
/// Every failure except "already exists as a directory" is returned
/// unmodified, including `AlreadyExists` when the path is occupied by a
/// non-directory.
pub fn ensure_directory(dir: &Path, mode: u32) -> std::io::Result<bool> {
    if dir.as_os_str().is_empty() {
        return Ok(false);
    }
    match create_one(dir, mode) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let parent = match dir.parent() {
                Some(p) if !p.as_os_str().is_empty() && p != dir => p,
                _ => return Err(e),
            };
            let created_above = ensure_directory(parent, mode)?;
            Ok(create_one(dir, mode)? || created_above)
        }
        other => other,
    }
}

fn create_one(dir: &Path, mode: u32) -> std::io::Result<bool> {
    match DirBuilder::new().mode(mode).create(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            if dir.is_dir() {
                Ok(false)
            } else {
                Err(e)
            }
        }
        Err(e) => Err(e),
    }
}
