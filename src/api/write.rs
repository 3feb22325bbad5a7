//! The atomic write protocol: stage, apply metadata, rename.
//!
//! `open` runs START -> DIR_ENSURED -> TEMP_OPEN and hands back an
//! `AtomicFile`. `AtomicFile::commit` runs CONTENT_WRITTEN ->
//! METADATA_APPLIED -> RENAMED. Anything that stops short of RENAMED (an
//! error, or the guard being dropped) is reported once as a failure and the
//! staging file, if it was created, stays on disk.
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::Level;
use rustix::fd::OwnedFd;
use serde_json::json;

use crate::config::Config;
use crate::fs::{
    apply_metadata_at, ensure_directory, fsync_dirfd, open_dir, open_temp, parent_dir,
    rename_into_place, resolve_metadata, temp_name_for, temp_path_for,
};
use crate::logging::{now_iso, AuditSink, Decision, Event, FactBuilder, FactsEmitter};
use crate::types::{MetadataSpec, WriteStage};

/// Writable staging file for one atomic replacement.
///
/// Write through `Write` or `as_file_mut`, then call `commit` to publish.
/// Dropping the guard without committing closes the handle and abandons the
/// staging file; the target is left untouched.
pub struct AtomicFile<'a> {
    file: File,
    dirfd: OwnedFd,
    pending: Pending<'a>,
}

struct Pending<'a> {
    facts: &'a dyn FactsEmitter,
    audit: &'a dyn AuditSink,
    config: &'a Config,
    path: PathBuf,
    tmp: PathBuf,
    tmp_name: OsString,
    final_name: OsString,
    overrides: MetadataSpec,
    applied: Option<MetadataSpec>,
    stage: WriteStage,
    ts: String,
    started: Instant,
    error: Option<String>,
    done: bool,
}

pub(crate) fn open<'a>(
    facts: &'a dyn FactsEmitter,
    audit: &'a dyn AuditSink,
    config: &'a Config,
    path: &Path,
    overrides: &MetadataSpec,
) -> io::Result<AtomicFile<'a>> {
    let mut pending = Pending::start(facts, audit, config, path, *overrides);
    if pending.final_name.is_empty() {
        return Err(pending.fail(io::Error::new(
            io::ErrorKind::InvalidInput,
            "target path has no file name",
        )));
    }

    let dir = parent_dir(path);
    audit.log(
        Level::Debug,
        &format!("Ensuring parent directory ({}) exists ..", dir.display()),
    );
    let res = ensure_directory(dir, config.dir_mode);
    if pending.check(res)? {
        audit.log(Level::Debug, &format!("Created directory ({}).", dir.display()));
    }
    pending.advance(WriteStage::DirEnsured);

    let res = open_dir(dir);
    let dirfd = pending.check(res)?;
    audit.log(
        Level::Debug,
        &format!("Opening temporary file for writing ({}) ..", pending.tmp.display()),
    );
    let res = open_temp(&dirfd, &pending.tmp_name, config.file_mode);
    let file = pending.check(res)?;
    pending.advance(WriteStage::TempOpen);

    Ok(AtomicFile {
        file,
        dirfd,
        pending,
    })
}

impl<'a> AtomicFile<'a> {
    /// Final location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.pending.path
    }

    /// Where the new content is being staged.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.pending.tmp
    }

    #[must_use]
    pub fn as_file(&self) -> &File {
        &self.file
    }

    pub fn as_file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Close the staging file, apply metadata (inherited from the current
    /// target, overridden per field by the explicit spec) and rename it over
    /// the target.
    ///
    /// # Errors
    ///
    /// The first failing syscall's error, unmodified. The staging file is left
    /// behind and the target untouched.
    pub fn commit(self) -> io::Result<()> {
        let AtomicFile {
            file,
            dirfd,
            mut pending,
        } = self;
        pending.advance(WriteStage::ContentWritten);
        if pending.config.durability.sync_file {
            let res = file.sync_all();
            pending.check(res)?;
        }
        drop(file);
        pending.publish(&dirfd)
    }
}

impl Write for AtomicFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn write_vectored(&mut self, bufs: &[io::IoSlice<'_>]) -> io::Result<usize> {
        self.file.write_vectored(bufs)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl std::fmt::Debug for AtomicFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("path", &self.pending.path)
            .field("tmp", &self.pending.tmp)
            .field("stage", &self.pending.stage)
            .finish_non_exhaustive()
    }
}

impl<'a> Pending<'a> {
    fn start(
        facts: &'a dyn FactsEmitter,
        audit: &'a dyn AuditSink,
        config: &'a Config,
        path: &Path,
        overrides: MetadataSpec,
    ) -> Self {
        audit.log(
            Level::Debug,
            &format!("Preparing to create or atomically replace file ({}) ..", path.display()),
        );
        Self {
            facts,
            audit,
            config,
            path: path.to_path_buf(),
            tmp: temp_path_for(path),
            tmp_name: temp_name_for(path),
            final_name: path.file_name().map(OsString::from).unwrap_or_default(),
            overrides,
            applied: None,
            stage: WriteStage::Start,
            ts: now_iso(),
            started: Instant::now(),
            error: None,
            done: false,
        }
    }

    fn advance(&mut self, stage: WriteStage) {
        self.stage = stage;
    }

    fn fail(&mut self, e: io::Error) -> io::Error {
        self.error = Some(e.to_string());
        e
    }

    fn check<T>(&mut self, res: io::Result<T>) -> io::Result<T> {
        res.map_err(|e| self.fail(e))
    }

    fn publish(mut self, dirfd: &OwnedFd) -> io::Result<()> {
        self.audit.log(
            Level::Debug,
            &format!("Copying permissions and ownership ({}) ..", self.path.display()),
        );
        let res = resolve_metadata(Some(&self.path), &self.overrides);
        let spec = self.check(res)?;
        if let Some(mode) = spec.mode {
            self.audit.log(
                Level::Debug,
                &format!("Changing file permissions ({}) to {mode:o} ..", self.tmp.display()),
            );
        }
        if spec.has_owner() {
            self.audit.log(
                Level::Debug,
                &format!(
                    "Changing owner ({}) and group ({}) of file ({}) ..",
                    spec.uid.map_or_else(|| "unchanged".to_string(), |u| u.to_string()),
                    spec.gid.map_or_else(|| "unchanged".to_string(), |g| g.to_string()),
                    self.tmp.display()
                ),
            );
        }
        let res = apply_metadata_at(dirfd, &self.tmp_name, &spec);
        self.check(res)?;
        self.applied = Some(spec);
        self.advance(WriteStage::MetadataApplied);

        self.audit.log(
            Level::Debug,
            &format!(
                "Moving new contents into place ({} -> {}) ..",
                self.tmp.display(),
                self.path.display()
            ),
        );
        let res = rename_into_place(dirfd, &self.tmp_name, &self.final_name);
        self.check(res)?;
        self.advance(WriteStage::Renamed);

        if self.config.durability.sync_parent {
            if let Err(e) = fsync_dirfd(dirfd) {
                self.audit.log(
                    Level::Warn,
                    &format!("Failed to sync directory of ({}): {e}", self.path.display()),
                );
            }
        }
        self.finish();
        Ok(())
    }

    fn finish(&mut self) {
        self.done = true;
        let elapsed = self.started.elapsed();
        self.audit.log(
            Level::Debug,
            &format!("Took {elapsed:?} to create or replace file ({}).", self.path.display()),
        );
        self.fact(Decision::Success, self.stage);
    }

    fn fact(&self, decision: Decision, stage: WriteStage) {
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        FactBuilder::new(Event::WriteResult)
            .field("ts", json!(self.ts))
            .field("path", json!(self.path.display().to_string()))
            .field("tmp", json!(self.tmp.display().to_string()))
            .field("stage", json!(stage))
            .field("last_stage", json!(self.stage))
            .field("temp_left", json!(decision == Decision::Failure && self.stage.has_temp_file()))
            .field("duration_ms", json!(duration_ms))
            .maybe_field("metadata", self.applied.map(|m| json!(m)))
            .maybe_field("error", self.error.as_ref().map(|e| json!(e)))
            .emit(self.facts, decision);
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let why = self.error.as_deref().unwrap_or("aborted by caller");
        let msg = if self.stage.has_temp_file() {
            format!(
                "Leaving temporary file ({}) behind: write to ({}) stopped at {} ({why})",
                self.tmp.display(),
                self.path.display(),
                self.stage.as_str()
            )
        } else {
            format!(
                "Failed to prepare write to ({}) at {} ({why})",
                self.path.display(),
                self.stage.as_str()
            )
        };
        self.audit.log(Level::Warn, &msg);
        self.fact(Decision::Failure, WriteStage::Failed);
    }
}
