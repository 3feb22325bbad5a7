//! Filesystem defaults apply when neither a reference nor a mode is given.
//! These tests change the process umask, so they run serially.

mod common;

use rustix::fs::Mode;
use rustix::process::umask;
use serial_test::serial;

use atomic_fs::{write_contents, MetadataSpec};
use common::{api, mode_of, with_temp_root};

struct UmaskGuard(Mode);

impl UmaskGuard {
    fn set(mask: u32) -> Self {
        UmaskGuard(umask(Mode::from_bits_truncate(mask)))
    }
}

impl Drop for UmaskGuard {
    fn drop(&mut self) {
        umask(self.0);
    }
}

#[test]
#[serial]
fn new_file_without_mode_gets_umasked_default() {
    let _g = UmaskGuard::set(0o027);
    let td = with_temp_root();
    let p = td.path().join("fresh");
    write_contents(&p, "x", None).unwrap();
    assert_eq!(mode_of(&p), 0o640);
}

#[test]
#[serial]
fn explicit_mode_ignores_umask() {
    let _g = UmaskGuard::set(0o077);
    let (fs, _, _) = api();
    let td = with_temp_root();
    let p = td.path().join("shared");
    fs.write_contents(&p, "x", &MetadataSpec::new().with_mode(0o664))
        .unwrap();
    assert_eq!(mode_of(&p), 0o664);
}

#[test]
#[serial]
fn created_directories_respect_umask() {
    let _g = UmaskGuard::set(0o022);
    let (fs, _, _) = api();
    let td = with_temp_root();
    let d = td.path().join("made");
    assert!(fs.ensure_directory(&d).unwrap());
    assert_eq!(mode_of(&d), 0o755);
}
