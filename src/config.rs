use crate::constants::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
use crate::types::TextEncoding;

/// Config governs defaults of an `AtomicFs` instance.
///
/// Per-call metadata overrides live in `MetadataSpec`; everything here applies
/// to every operation the instance performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Mode used for each directory created while ensuring a parent exists.
    pub dir_mode: u32,
    /// Mode the staging file is created with (subject to umask).
    pub file_mode: u32,
    /// Encoding applied to text passed to `write_contents`.
    pub encoding: TextEncoding,
    pub durability: Durability,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            encoding: TextEncoding::Utf8,
            durability: Durability::default(),
        }
    }
}

impl Config {
    /// Defaults plus fsync of both the staged file and its parent directory.
    #[must_use]
    pub fn durable() -> Self {
        Self {
            durability: Durability {
                sync_file: true,
                sync_parent: true,
            },
            ..Self::default()
        }
    }
}

/// Fsync knobs. Atomicity never depends on these; they only decide whether the
/// new content survives a crash right after the call returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Durability {
    /// `fsync` the staging file before it is closed and renamed.
    pub sync_file: bool,
    /// `fsync` the parent directory after the rename (failures are logged only).
    pub sync_parent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plain_rename_protocol() {
        let c = Config::default();
        assert_eq!(c.dir_mode, 0o777);
        assert_eq!(c.file_mode, 0o666);
        assert_eq!(c.encoding, TextEncoding::Utf8);
        assert!(!c.durability.sync_file);
        assert!(!c.durability.sync_parent);
    }

    #[test]
    fn durable_enables_both_syncs() {
        let c = Config::durable();
        assert!(c.durability.sync_file && c.durability.sync_parent);
        assert_eq!(c.dir_mode, Config::default().dir_mode);
    }
}
