//! Data-only description of the metadata a write may carry over.
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use serde::Serialize;

use crate::constants::PERMISSION_BITS;

/// Permission bits and ownership to apply to a file. `None` means "leave
/// unchanged" for that field; the three fields are independent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetadataSpec {
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

impl MetadataSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: None,
            uid: None,
            gid: None,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub const fn with_uid(mut self, uid: u32) -> Self {
        self.uid = Some(uid);
        self
    }

    #[must_use]
    pub const fn with_gid(mut self, gid: u32) -> Self {
        self.gid = Some(gid);
        self
    }

    /// Snapshot of an existing file: permission bits (file type stripped),
    /// owner and group.
    #[must_use]
    pub fn from_metadata(md: &Metadata) -> Self {
        Self {
            mode: Some(md.mode() & PERMISSION_BITS),
            uid: Some(md.uid()),
            gid: Some(md.gid()),
        }
    }

    /// Field-wise fallback: values set on `self` win, unset ones come from
    /// `fallback`.
    #[must_use]
    pub fn or(&self, fallback: &Self) -> Self {
        Self {
            mode: self.mode.or(fallback.mode),
            uid: self.uid.or(fallback.uid),
            gid: self.gid.or(fallback.gid),
        }
    }

    /// True when applying this spec would not touch the file.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mode.is_none() && self.uid.is_none() && self.gid.is_none()
    }

    /// True when an ownership change is needed.
    #[must_use]
    pub const fn has_owner(&self) -> bool {
        self.uid.is_some() || self.gid.is_some()
    }
}
