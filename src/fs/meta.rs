//! Permission and ownership propagation, the library form of
//! `chmod --reference` + `chown --reference`.
//!
//! Resolution, per field (mode, uid, gid independently):
//! 1. explicit override, else
//! 2. the reference file's current value, else
//! 3. leave the target's value unchanged.
//!
//! A missing reference is not an error; it simply contributes nothing.
use std::ffi::OsStr;
use std::fs::Permissions;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use rustix::fd::AsFd;
use rustix::fs::{fchmod, openat, Mode, OFlags};

use super::atomic::{c_name, errno_to_io};
use crate::types::MetadataSpec;

/// Compute the effective metadata for a copy. Reads `reference` (following
/// symlinks) when given.
///
/// # Errors
///
/// Any failure to stat `reference` other than `NotFound`.
pub fn resolve_metadata(
    reference: Option<&Path>,
    overrides: &MetadataSpec,
) -> std::io::Result<MetadataSpec> {
    let inherited = match reference {
        Some(r) => match std::fs::metadata(r) {
            Ok(md) => MetadataSpec::from_metadata(&md),
            Err(e) if e.kind() == ErrorKind::NotFound => MetadataSpec::new(),
            Err(e) => return Err(e),
        },
        None => MetadataSpec::new(),
    };
    Ok(overrides.or(&inherited))
}

/// Apply an already resolved spec to `target`. Ownership is changed before
/// permissions so a non-root `chown` cannot strip setuid/setgid bits that the
/// spec asks for. Unset uid/gid are passed to `chown` as "unchanged".
///
/// # Errors
///
/// `chown`/`chmod` failures, unmodified.
pub fn apply_metadata(target: &Path, spec: &MetadataSpec) -> std::io::Result<()> {
    if spec.has_owner() {
        std::os::unix::fs::chown(target, spec.uid, spec.gid)?;
    }
    if let Some(mode) = spec.mode {
        std::fs::set_permissions(target, Permissions::from_mode(mode))?;
    }
    Ok(())
}

/// `apply_metadata` for the entry `name` inside `dirfd`. The entry is opened
/// read-only without following a final symlink, then changed through that
/// descriptor (`fchown`, `fchmod`). An empty spec opens nothing.
///
/// # Errors
///
/// `openat`/`fchown`/`fchmod` failures, unmodified.
pub fn apply_metadata_at<Fd: AsFd>(
    dirfd: Fd,
    name: &OsStr,
    spec: &MetadataSpec,
) -> std::io::Result<()> {
    if spec.is_empty() {
        return Ok(());
    }
    let c = c_name(name)?;
    let fd = openat(
        dirfd,
        c.as_c_str(),
        OFlags::RDONLY | OFlags::CLOEXEC | OFlags::NOFOLLOW,
        Mode::empty(),
    )
    .map_err(errno_to_io)?;
    if spec.has_owner() {
        std::os::unix::fs::fchown(&fd, spec.uid, spec.gid)?;
    }
    if let Some(mode) = spec.mode {
        fchmod(&fd, Mode::from_bits_truncate(mode)).map_err(errno_to_io)?;
    }
    Ok(())
}

/// Copy permissions and ownership onto `target` from `reference` and/or the
/// explicit `overrides`. Returns the spec that was applied.
///
/// # Errors
///
/// See `resolve_metadata` and `apply_metadata`.
pub fn copy_metadata(
    target: &Path,
    reference: Option<&Path>,
    overrides: &MetadataSpec,
) -> std::io::Result<MetadataSpec> {
    let effective = resolve_metadata(reference, overrides)?;
    apply_metadata(target, &effective)?;
    Ok(effective)
}
