//! The library code for the `themer` theme tool. The tool manages the SASS
//! themes for a blog site and can be generally broken down into two
//! independent pipelines:
//!
//! 1. Building stylesheets: discovering theme configurations on disk
//!    ([`crate::discover`]), planning which of them to compile
//!    ([`crate::plan`]), and running the SASS compiler on each planned target
//!    ([`crate::compile`])
//! 2. Selecting the active theme: validating a requested (or randomly chosen)
//!    theme against the compiled stylesheets and persisting the choice to a
//!    small state file ([`crate::select`])
//!
//! Of the two, building is the more involved. A theme is a directory under
//! the configured themes root containing a `theme.scss` entry file; compiling
//! it produces a minified `<theme>.min.css` artifact in the stylesheets
//! directory. Only themes with an artifact are eligible for selection, which
//! is why the selector consults the stylesheets directory rather than the
//! themes root.
//!
//! The planner supports three modes: a single named theme, only the themes
//! missing an artifact, or everything. Per-theme problems (a missing entry
//! file, a compiler run that produced nothing) skip that theme and let the
//! batch continue; only structural problems like a missing output directory
//! abort a run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod compile;
pub mod config;
pub mod discover;
pub mod plan;
pub mod select;
pub mod util;
