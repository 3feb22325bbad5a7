//! Filesystem mechanism. Functions here emit no logs and return the
//! underlying `std::io::Error` unchanged; orchestration and observability live
//! in `api`.
pub mod atomic;
pub mod dirs;
pub mod meta;
pub mod paths;
pub mod touch;

pub use atomic::{fsync_dirfd, open_dir, open_temp, rename_into_place};
pub use dirs::ensure_directory;
pub use meta::{apply_metadata, apply_metadata_at, copy_metadata, resolve_metadata};
pub use paths::{parent_dir, temp_name_for, temp_path_for};
pub use touch::touch_file;
