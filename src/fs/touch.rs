use std::fs::{FileTimes, OpenOptions};
use std::path::Path;
use std::time::SystemTime;

use super::dirs::ensure_directory;
use super::paths::parent_dir;

/// `touch(1)`: create missing parent directories (with `dir_mode`), create the
/// file empty if absent, and set its access and modification times to now.
/// Existing content is never modified.
///
/// # Errors
///
/// Directory creation, open, or timestamp update failures, unmodified.
pub fn touch_file(path: &Path, dir_mode: u32) -> std::io::Result<()> {
    ensure_directory(parent_dir(path), dir_mode)?;
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let now = SystemTime::now();
    file.set_times(FileTimes::new().set_accessed(now).set_modified(now))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn creates_parents_and_empty_file() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("a/b/c/newfile");
        touch_file(&p, 0o777).unwrap();
        assert!(p.parent().unwrap().is_dir());
        assert_eq!(std::fs::read(&p).unwrap(), b"");
    }

    #[test]
    fn keeps_content_and_refreshes_mtime() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("f");
        std::fs::write(&p, b"keep me").unwrap();
        let old = SystemTime::now() - Duration::from_secs(3600);
        let f = OpenOptions::new().write(true).open(&p).unwrap();
        f.set_times(FileTimes::new().set_accessed(old).set_modified(old)).unwrap();
        drop(f);

        let start = SystemTime::now();
        touch_file(&p, 0o777).unwrap();
        let md = std::fs::metadata(&p).unwrap();
        assert_eq!(std::fs::read(&p).unwrap(), b"keep me");
        assert!(md.modified().unwrap() + Duration::from_secs(1) >= start);
        assert!(md.modified().unwrap() > old + Duration::from_secs(60));
    }
}
