#![forbid(unsafe_code)]
//! atomic-fs: create or replace files so readers never see partial content.
//!
//! Safety model highlights:
//! - New content is staged in a hidden sibling (`.{name}.tmp-{pid}`) and published with a
//!   single `renameat` inside the parent directory, so it never crosses a mount.
//! - Permissions and ownership of the file being replaced carry over by default; explicit
//!   overrides win per field.
//! - Filesystem errors are returned unmodified. Only "directory already exists" and
//!   "reference file missing" are recovered locally.
//! - A failed write leaves its staging file behind; nothing is cleaned up implicitly.
//! - No locking between writers: the last rename wins.
//!
//! This crate forbids `unsafe` and uses `rustix` for the `*at` syscalls.

pub mod config;
pub mod constants;
pub mod fs;
pub mod logging;
pub mod types;

mod api;

pub use api::*;
pub use config::{Config, Durability};
pub use fs::{copy_metadata, ensure_directory, temp_path_for};
pub use types::{Contents, EncodeError, MetadataSpec, TextEncoding, WriteStage};
