//! Permission and ownership propagation through the public API.

mod common;

use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use atomic_fs::{copy_metadata, MetadataSpec};
use common::{api, mode_of, with_temp_root};

fn file(dir: &Path, name: &str, mode: u32) -> std::path::PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, name).unwrap();
    std::fs::set_permissions(&p, std::fs::Permissions::from_mode(mode)).unwrap();
    p
}

#[test]
fn reference_mode_and_ownership_are_copied() {
    let td = with_temp_root();
    let reference = file(td.path(), "ref", 0o640);
    let target = file(td.path(), "target", 0o666);
    let rmd = std::fs::metadata(&reference).unwrap();

    copy_metadata(&target, Some(&reference), &MetadataSpec::new()).unwrap();

    let tmd = std::fs::metadata(&target).unwrap();
    assert_eq!(mode_of(&target), 0o640);
    assert_eq!(tmd.uid(), rmd.uid());
    assert_eq!(tmd.gid(), rmd.gid());
}

#[test]
fn missing_reference_uses_explicit_mode_silently() {
    let td = with_temp_root();
    let target = file(td.path(), "target", 0o644);
    let before = std::fs::metadata(&target).unwrap();

    copy_metadata(
        &target,
        Some(&td.path().join("missing")),
        &MetadataSpec::new().with_mode(0o600),
    )
    .unwrap();

    let after = std::fs::metadata(&target).unwrap();
    assert_eq!(mode_of(&target), 0o600);
    assert_eq!((after.uid(), after.gid()), (before.uid(), before.gid()));
}

#[test]
fn setuid_bit_survives_copy() {
    let td = with_temp_root();
    let reference = file(td.path(), "ref", 0o2750);
    let target = file(td.path(), "target", 0o644);
    copy_metadata(&target, Some(&reference), &MetadataSpec::new()).unwrap();
    assert_eq!(mode_of(&target), 0o2750);
}

#[test]
fn explicit_owner_matching_current_is_accepted() {
    let (fs, _, audit) = api();
    let td = with_temp_root();
    let target = file(td.path(), "target", 0o644);
    let md = std::fs::metadata(&target).unwrap();

    let applied = fs
        .copy_metadata(
            &target,
            None,
            &MetadataSpec::new().with_uid(md.uid()).with_gid(md.gid()),
        )
        .unwrap();
    assert_eq!(applied.mode, None);
    assert_eq!(mode_of(&target), 0o644);
    assert!(audit
        .lines
        .lock()
        .unwrap()
        .iter()
        .any(|(_, m)| m.starts_with("Applied mode unchanged owner")));
}

#[test]
fn symlinked_reference_is_followed() {
    let td = with_temp_root();
    let real = file(td.path(), "real", 0o604);
    let link = td.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();
    let target = file(td.path(), "target", 0o644);
    copy_metadata(&target, Some(&link), &MetadataSpec::new()).unwrap();
    assert_eq!(mode_of(&target), 0o604);
}

#[test]
fn dangling_reference_counts_as_missing() {
    let td = with_temp_root();
    let link = td.path().join("dangling");
    std::os::unix::fs::symlink(td.path().join("gone"), &link).unwrap();
    let target = file(td.path(), "target", 0o644);
    let applied = copy_metadata(&target, Some(&link), &MetadataSpec::new()).unwrap();
    assert!(applied.is_empty());
    assert_eq!(mode_of(&target), 0o644);
}
