// Facade for the API; the write protocol lives in src/api/write.rs.

use std::fs::File;
use std::io::{self, Write as _};
use std::path::Path;
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::config::Config;
use crate::logging::{
    now_iso, AuditSink, Decision, Event, FactBuilder, FactsEmitter, LogSink,
};
use crate::types::{Contents, MetadataSpec, TextEncoding};

#[path = "api/builder.rs"]
mod builder;
#[path = "api/write.rs"]
mod write_impl;

pub use builder::AtomicFsBuilder;
pub use write_impl::AtomicFile;

/// Atomic file operations with injected observability.
///
/// `E` receives one structured fact per operation, `A` receives trace lines
/// for each step. Neither influences control flow.
pub struct AtomicFs<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    config: Config,
}

/// Instance that reports through the `log` facade.
pub type DefaultFs = AtomicFs<LogSink, LogSink>;

impl Default for DefaultFs {
    fn default() -> Self {
        Self::new(LogSink, LogSink, Config::default())
    }
}

impl<E: FactsEmitter, A: AuditSink> AtomicFs<E, A> {
    pub fn new(facts: E, audit: A, config: Config) -> Self {
        Self {
            facts,
            audit,
            config,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ensure `dir` and its ancestors exist (mode from `Config::dir_mode`).
    /// Returns whether anything was created.
    ///
    /// # Errors
    ///
    /// Any failure other than "already exists as a directory", unmodified.
    pub fn ensure_directory(&self, dir: impl AsRef<Path>) -> io::Result<bool> {
        let dir = dir.as_ref();
        let ts = now_iso();
        let t0 = Instant::now();
        self.audit.log(
            Level::Debug,
            &format!("Trying to create directory ({}) ..", dir.display()),
        );
        let res = crate::fs::ensure_directory(dir, self.config.dir_mode);
        match &res {
            Ok(true) => self.audit.log(Level::Debug, "Successfully created directory."),
            Ok(false) => self.audit.log(Level::Debug, "Directory already exists."),
            Err(e) => self.audit.log(
                Level::Warn,
                &format!("Failed to create directory ({}): {e}", dir.display()),
            ),
        }
        FactBuilder::new(Event::MkdirResult)
            .field("ts", json!(ts))
            .field("path", json!(dir.display().to_string()))
            .field("duration_ms", json!(elapsed_ms(t0)))
            .maybe_field("created", res.as_ref().ok().map(|c| json!(c)))
            .maybe_field("error", res.as_ref().err().map(|e| json!(e.to_string())))
            .emit(&self.facts, decision_of(&res));
        res
    }

    /// Copy permissions and ownership onto `target` from `reference` and/or
    /// explicit overrides; explicit fields win. A missing reference
    /// contributes nothing. Returns the spec that was applied.
    ///
    /// # Errors
    ///
    /// Reference stat failures other than `NotFound`, and `chown`/`chmod`
    /// failures, unmodified.
    pub fn copy_metadata(
        &self,
        target: impl AsRef<Path>,
        reference: Option<&Path>,
        overrides: &MetadataSpec,
    ) -> io::Result<MetadataSpec> {
        let target = target.as_ref();
        if let Some(r) = reference {
            self.audit.log(
                Level::Debug,
                &format!("Copying permissions and ownership ({}) ..", r.display()),
            );
        }
        let res = crate::fs::copy_metadata(target, reference, overrides);
        match &res {
            Ok(spec) if spec.is_empty() => self.audit.log(
                Level::Debug,
                &format!("Nothing to change on ({}).", target.display()),
            ),
            Ok(spec) => self.audit.log(
                Level::Debug,
                &format!(
                    "Applied mode {} owner {} group {} to ({}).",
                    spec.mode.map_or_else(|| "unchanged".to_string(), |m| format!("{m:o}")),
                    spec.uid.map_or_else(|| "unchanged".to_string(), |u| u.to_string()),
                    spec.gid.map_or_else(|| "unchanged".to_string(), |g| g.to_string()),
                    target.display()
                ),
            ),
            Err(e) => self.audit.log(
                Level::Warn,
                &format!("Failed to copy metadata to ({}): {e}", target.display()),
            ),
        }
        res
    }

    /// Begin an atomic replacement of `path`. See `AtomicFile`.
    ///
    /// # Errors
    ///
    /// Target without a file name (`InvalidInput`), parent directory creation,
    /// or staging file open failures.
    pub fn open(
        &self,
        path: impl AsRef<Path>,
        overrides: &MetadataSpec,
    ) -> io::Result<AtomicFile<'_>> {
        write_impl::open(&self.facts, &self.audit, &self.config, path.as_ref(), overrides)
    }

    /// Atomically create or replace `path` with whatever `f` writes.
    ///
    /// The handle given to `f` is closed before anything else happens. If `f`
    /// fails, its error is returned, the target is untouched and the staging
    /// file is left on disk. Otherwise metadata is applied and the staging
    /// file renamed over the target.
    ///
    /// # Errors
    ///
    /// The error of `f`, or any filesystem error converted into `Er`.
    pub fn write_file<T, Er, F>(
        &self,
        path: impl AsRef<Path>,
        overrides: &MetadataSpec,
        f: F,
    ) -> Result<T, Er>
    where
        F: FnOnce(&mut File) -> Result<T, Er>,
        Er: From<io::Error>,
    {
        let mut staged = self.open(path, overrides)?;
        let value = f(staged.as_file_mut())?;
        staged.commit()?;
        Ok(value)
    }

    /// Atomically write `contents`; text is encoded with `Config::encoding`.
    ///
    /// # Errors
    ///
    /// `InvalidData` for unencodable text (nothing touched on disk), else as
    /// `write_file`.
    pub fn write_contents<'c>(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Contents<'c>>,
        overrides: &MetadataSpec,
    ) -> io::Result<()> {
        self.write_contents_encoded(path, contents, self.config.encoding, overrides)
    }

    /// `write_contents` with an explicit text encoding.
    ///
    /// # Errors
    ///
    /// See `write_contents`.
    pub fn write_contents_encoded<'c>(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Contents<'c>>,
        encoding: TextEncoding,
        overrides: &MetadataSpec,
    ) -> io::Result<()> {
        let contents = contents.into();
        let bytes = contents.encode(encoding)?;
        self.write_file(path, overrides, |f| f.write_all(&bytes))
    }

    /// Create `path` (and parents) if missing and set its times to now.
    ///
    /// # Errors
    ///
    /// Directory creation, open or timestamp failures, unmodified.
    pub fn touch(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let ts = now_iso();
        let t0 = Instant::now();
        self.audit
            .log(Level::Debug, &format!("Touching file: {}", path.display()));
        let res = crate::fs::touch_file(path, self.config.dir_mode);
        if let Err(e) = &res {
            self.audit.log(
                Level::Warn,
                &format!("Failed to touch ({}): {e}", path.display()),
            );
        }
        FactBuilder::new(Event::TouchResult)
            .field("ts", json!(ts))
            .field("path", json!(path.display().to_string()))
            .field("duration_ms", json!(elapsed_ms(t0)))
            .maybe_field("error", res.as_ref().err().map(|e| json!(e.to_string())))
            .emit(&self.facts, decision_of(&res));
        res
    }
}

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn decision_of<T>(res: &io::Result<T>) -> Decision {
    if res.is_ok() {
        Decision::Success
    } else {
        Decision::Failure
    }
}

/// Atomically create or replace `path` with whatever `f` writes, using a
/// `log`-backed default instance. `mode` overrides the permissions inherited
/// from an existing target.
///
/// # Errors
///
/// See `AtomicFs::write_file`.
pub fn write_file<T, Er, F>(path: impl AsRef<Path>, mode: Option<u32>, f: F) -> Result<T, Er>
where
    F: FnOnce(&mut File) -> Result<T, Er>,
    Er: From<io::Error>,
{
    let overrides = MetadataSpec {
        mode,
        ..MetadataSpec::new()
    };
    DefaultFs::default().write_file(path, &overrides, f)
}

/// Atomically write bytes or UTF-8 text to `path`.
///
/// # Errors
///
/// See `AtomicFs::write_contents`.
pub fn write_contents<'c>(
    path: impl AsRef<Path>,
    contents: impl Into<Contents<'c>>,
    mode: Option<u32>,
) -> io::Result<()> {
    let overrides = MetadataSpec {
        mode,
        ..MetadataSpec::new()
    };
    DefaultFs::default().write_contents(path, contents, &overrides)
}

/// `touch(1)` with missing parent directories created.
///
/// # Errors
///
/// See `AtomicFs::touch`.
pub fn touch(path: impl AsRef<Path>) -> io::Result<()> {
    DefaultFs::default().touch(path)
}
