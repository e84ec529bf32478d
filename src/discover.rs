//! Read-only queries over the theme directory layout. The file system is the
//! source of truth for which themes exist and which have been compiled; these
//! functions re-query it on every call and never cache. Both queries treat
//! file system errors (a missing directory, unreadable entries) as "no themes
//! found" rather than failing, since an empty result is handled the same way
//! by every caller.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Returns the names of the theme configurations found under `root`. A theme
/// is any subdirectory of the themes root; plain files are ignored. The
/// result is sorted (it's a [`BTreeSet`]) so that build order and diagnostics
/// are deterministic.
pub fn themes(root: &Path) -> BTreeSet<String> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return BTreeSet::new(),
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}

/// Returns the theme names for which a compiled stylesheet artifact exists in
/// `directory`. An artifact is any file whose name ends in `suffix` (e.g.
/// `dark.min.css` with suffix `.min.css` yields `dark`); the suffix is
/// stripped so the result is comparable with [`themes`].
pub fn built(directory: &Path, suffix: &str) -> BTreeSet<String> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(_) => return BTreeSet::new(),
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| name.strip_suffix(suffix).map(str::to_owned))
        .collect()
}
