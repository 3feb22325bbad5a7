//! Pure path computations for the write protocol. No I/O happens here.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::constants::{FALLBACK_BASENAME, TMP_TAG};

/// Directory holding `target`. A bare relative name lives in `.`.
#[must_use]
pub fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Basename of the staging file for `target`, for the calling process.
#[must_use]
pub fn temp_name_for(target: &Path) -> OsString {
    temp_name_with_pid(target, std::process::id())
}

/// Staging path for `target`: same directory, leading dot, `.tmp-<pid>` tag.
/// `/dir/file.txt` becomes `/dir/.file.txt.tmp-<pid>`.
///
/// Not collision-free across threads of one process writing the same target.
#[must_use]
pub fn temp_path_for(target: &Path) -> PathBuf {
    let name = temp_name_for(target);
    match target.parent() {
        Some(p) => p.join(name),
        None => PathBuf::from(name),
    }
}

pub(crate) fn temp_name_with_pid(target: &Path, pid: u32) -> OsString {
    let base = target
        .file_name()
        .unwrap_or_else(|| OsStr::new(FALLBACK_BASENAME));
    let mut name = OsString::with_capacity(base.len() + TMP_TAG.len() + 11);
    name.push(".");
    name.push(base);
    name.push(TMP_TAG);
    name.push(pid.to_string());
    name
}
