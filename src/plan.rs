//! Decides which themes a build run should compile. The planner diffs the set
//! of discovered theme configurations ([`crate::discover::themes`]) against
//! the set of already-compiled artifacts ([`crate::discover::built`])
//! according to the requested [`Mode`], producing an ordered [`Plan`] which is
//! then materialized into concrete [`BuildTarget`]s for the compiler
//! ([`crate::compile`]).

use crate::config::Config;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Selects which discovered themes become build targets.
pub enum Mode {
    /// Build exactly the named theme. The name must be in the discovered set.
    Single(String),

    /// Build only the themes that don't have an artifact yet.
    MissingOnly,

    /// Build every discovered theme, overwriting existing artifacts.
    All,
}

/// The outcome of planning: the theme names to build, in order, plus how many
/// of them already had an artifact before the run. The count is informational
/// only and never changes what gets built.
pub struct Plan {
    pub targets: Vec<String>,
    pub already_built: usize,
}

/// A single unit of work for the compiler: the theme name, the path of its
/// SASS entry file, and the path the compiled artifact should end up at.
/// Created by [`Plan::build_targets`] and consumed once by
/// [`crate::compile::Compiler::compile_all`].
pub struct BuildTarget {
    pub name: String,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
}

/// Computes the [`Plan`] for a build run.
///
/// * [`Mode::Single`] plans just that theme, failing with
///   [`Error::UnknownTheme`] if it wasn't discovered.
/// * [`Mode::MissingOnly`] plans exactly `discovered − built`.
/// * [`Mode::All`] plans every discovered theme regardless of `built`.
pub fn plan(
    discovered: &BTreeSet<String>,
    built: &BTreeSet<String>,
    mode: Mode,
) -> Result<Plan> {
    match mode {
        Mode::Single(name) => {
            if !discovered.contains(&name) {
                return Err(Error::UnknownTheme(name));
            }
            let already_built = built.contains(&name) as usize;
            Ok(Plan {
                targets: vec![name],
                already_built,
            })
        }
        Mode::MissingOnly => Ok(Plan {
            targets: discovered.difference(built).cloned().collect(),
            already_built: 0,
        }),
        Mode::All => Ok(Plan {
            targets: discovered.iter().cloned().collect(),
            already_built: discovered.intersection(built).count(),
        }),
    }
}

impl Plan {
    /// Materializes the planned theme names into [`BuildTarget`]s using the
    /// configured theme and stylesheet directories.
    pub fn build_targets(&self, config: &Config) -> Vec<BuildTarget> {
        self.targets
            .iter()
            .map(|name| BuildTarget {
                name: name.clone(),
                source_path: config.source_entry(name),
                output_path: config.artifact(name),
            })
            .collect()
    }
}

/// The result of a fallible planning operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error computing a build plan.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when a single-theme build names a theme that isn't in the
    /// themes directory.
    UnknownTheme(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownTheme(name) => write!(
                f,
                "`{}` is not a detected theme; it has no directory under the themes root",
                name
            ),
        }
    }
}

impl std::error::Error for Error {}
