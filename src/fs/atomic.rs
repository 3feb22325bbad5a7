//! Atomic publish primitives.
//!
//! A write is staged in a sibling of the target and published with a single
//! `renameat` relative to the parent directory handle:
//! `open_dir(parent) -> openat(tmp, CREAT|TRUNC|NOFOLLOW) -> write -> renameat(tmp, final)`.
//! Rename within one directory never crosses a mount, so readers of the final
//! name see either the old file or the new one, never a mix.
use std::ffi::{CString, OsStr};
use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use rustix::fd::OwnedFd;
use rustix::fs::{openat, renameat, Mode, OFlags, CWD};
use rustix::io::Errno;

pub(crate) fn errno_to_io(e: Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e.raw_os_error())
}

pub(crate) fn c_name(name: &OsStr) -> std::io::Result<CString> {
    CString::new(name.as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid cstring"))
}

/// Open a directory as the anchor for `*at` calls. Symlinks along `dir`,
/// including a final component that links to a directory, are followed. An
/// empty path opens the current directory.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened.
pub fn open_dir(dir: &Path) -> std::io::Result<OwnedFd> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let c = c_name(dir.as_os_str())?;
    openat(
        CWD,
        c.as_c_str(),
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )
    .map_err(errno_to_io)
}

/// Create (or truncate) the staging file `name` inside `dirfd` for writing.
/// A symlink planted at the staging name is refused (`ELOOP`).
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened.
pub fn open_temp(dirfd: &OwnedFd, name: &OsStr, mode: u32) -> std::io::Result<File> {
    let c = c_name(name)?;
    let fd = openat(
        dirfd,
        c.as_c_str(),
        OFlags::WRONLY | OFlags::CREATE | OFlags::TRUNC | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        Mode::from_bits_truncate(mode),
    )
    .map_err(errno_to_io)?;
    Ok(File::from(fd))
}

/// Atomically rename `tmp_name` over `final_name`, both inside `dirfd`.
///
/// # Errors
///
/// Returns the `renameat` error unmodified.
pub fn rename_into_place(
    dirfd: &OwnedFd,
    tmp_name: &OsStr,
    final_name: &OsStr,
) -> std::io::Result<()> {
    let old_c = c_name(tmp_name)?;
    let new_c = c_name(final_name)?;
    renameat(dirfd, old_c.as_c_str(), dirfd, new_c.as_c_str()).map_err(errno_to_io)
}

/// Fsync a directory using an already-open directory file descriptor.
///
/// # Errors
///
/// Returns the `fsync` error.
pub fn fsync_dirfd(dirfd: &OwnedFd) -> std::io::Result<()> {
    rustix::fs::fsync(dirfd).map_err(errno_to_io)
}
