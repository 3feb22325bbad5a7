//! Shared crate-wide constants.
//!
//! Centralizes the magic values used by the write protocol and its defaults.

/// Literal tag inserted between a target's basename and the process id when
/// naming its staging file: `.{basename}{TMP_TAG}{pid}`, e.g. `.hosts.tmp-4242`.
/// It also moves the original extension out of the final position so globs like
/// `*.conf` do not pick up in-flight writes.
pub const TMP_TAG: &str = ".tmp-";

/// Fallback basename for targets without a final component (`/`, `..`).
pub const FALLBACK_BASENAME: &str = "target";

/// Default mode for directories created by `ensure_directory`, before umask.
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// Initial mode of a staging file, before umask. Metadata copied from the
/// target (or given explicitly) replaces it before the rename.
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Permission bits (including setuid/setgid/sticky) extracted from `st_mode`.
pub const PERMISSION_BITS: u32 = 0o7777;

/// Subsystem label attached to every emitted fact.
pub const FACTS_SUBSYSTEM: &str = "atomic_fs";
