//! Invokes the external stylesheet compiler on planned [`BuildTarget`]s. The
//! compiler is run as a child process with an explicit argument vector (no
//! shell involved) and targets are processed strictly one at a time, each
//! invocation blocking until it completes. Per-target problems are collected
//! into the [`Summary`] so the batch keeps going; only a missing output
//! directory aborts the whole run.

use crate::plan::BuildTarget;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Runs the stylesheet compiler over a batch of build targets.
pub struct Compiler<'a> {
    /// The compiler program to invoke, e.g. `sass`. Resolved through `PATH`
    /// like any other command.
    pub program: &'a str,

    /// Flags passed before the source and destination paths, e.g.
    /// `--no-source-map --style=compressed`.
    pub flags: &'a [&'a str],

    /// The directory compiled artifacts are written into. Must exist before
    /// the run starts; the compiler won't create it.
    pub output_directory: &'a Path,
}

/// What happened over a whole batch: which themes produced an artifact and
/// which were skipped, with the reason they were skipped.
#[derive(Default)]
pub struct Summary {
    pub built: Vec<String>,
    pub failures: Vec<(String, Failure)>,
}

impl Compiler<'_> {
    /// Compiles every target in order, collecting per-target outcomes into a
    /// [`Summary`]. Fails up front with [`Error::MissingOutputDir`] if the
    /// output directory doesn't exist; everything after that point is
    /// recorded in the summary rather than propagated, so one broken theme
    /// doesn't stop the rest of the batch.
    pub fn compile_all(&self, targets: &[BuildTarget]) -> Result<Summary> {
        if !self.output_directory.is_dir() {
            return Err(Error::MissingOutputDir(self.output_directory.to_owned()));
        }

        let mut summary = Summary::default();
        for target in targets {
            match self.compile(target) {
                Ok(()) => summary.built.push(target.name.clone()),
                Err(failure) => summary.failures.push((target.name.clone(), failure)),
            }
        }
        Ok(summary)
    }

    /// Compiles a single target. Success is judged solely by the destination
    /// artifact existing afterward; the child's exit status is only carried
    /// along for the diagnostic when verification fails, since some compiler
    /// wrappers exit zero without writing anything.
    fn compile(&self, target: &BuildTarget) -> std::result::Result<(), Failure> {
        if !target.source_path.is_file() {
            return Err(Failure::MissingSource(target.source_path.clone()));
        }

        let status = Command::new(self.program)
            .args(self.flags)
            .arg(&target.source_path)
            .arg(&target.output_path)
            .status()
            .map_err(Failure::Spawn)?;

        if !target.output_path.is_file() {
            return Err(Failure::Verification {
                output: target.output_path.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// The result of starting a compile run.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a whole-run compile error. Unlike [`Failure`], hitting one of
/// these aborts the batch.
#[derive(Debug)]
pub enum Error {
    /// Returned when the stylesheet output directory doesn't exist. Nothing
    /// can be built without somewhere to put the artifacts.
    MissingOutputDir(PathBuf),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingOutputDir(path) => write!(
                f,
                "The stylesheet output directory `{}` cannot be found; create it (or fix the configured path) and rerun",
                path.display()
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Represents a per-target failure. The target is skipped and the batch
/// continues.
#[derive(Debug)]
pub enum Failure {
    /// The theme directory exists but has no SASS entry file.
    MissingSource(PathBuf),

    /// The compiler process couldn't be started at all (typically the
    /// program isn't installed or isn't on `PATH`).
    Spawn(io::Error),

    /// The compiler ran but the expected artifact never appeared.
    Verification {
        output: PathBuf,
        status: ExitStatus,
    },
}

impl fmt::Display for Failure {
    /// Displays a [`Failure`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Failure::MissingSource(path) => write!(
                f,
                "missing SASS entry file `{}`; every theme directory needs one",
                path.display()
            ),
            Failure::Spawn(err) => write!(f, "could not start the stylesheet compiler: {}", err),
            Failure::Verification { output, status } => write!(
                f,
                "the compiler exited ({}) but no artifact appeared at `{}`; try running it by hand to see what went wrong",
                status,
                output.display()
            ),
        }
    }
}

impl std::error::Error for Failure {
    /// Implements the [`std::error::Error`] trait for [`Failure`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Failure::MissingSource(_) => None,
            Failure::Spawn(err) => Some(err),
            Failure::Verification { .. } => None,
        }
    }
}
