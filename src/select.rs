//! Persists the active-theme selection. The selection lives in a single-line
//! state file (theme name plus trailing newline) which a static-asset
//! resolver reads elsewhere; this module is the only writer. A theme is
//! eligible for selection only once its compiled artifact exists, so the
//! available set here is the built set from [`crate::discover::built`], not
//! the raw themes directory.

use crate::discover;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// The sentinel recorded as the previous theme when the state file is absent
/// or unreadable.
pub const NO_THEME: &str = "none";

/// Reads, validates, and writes the active-theme selection.
pub struct Selector<'a> {
    /// The directory holding compiled stylesheet artifacts.
    pub stylesheets_directory: &'a Path,

    /// The artifact file-name suffix, e.g. `.min.css`.
    pub artifact_suffix: &'a str,

    /// The state file the selection is persisted to.
    pub state_file: &'a Path,
}

/// The outcome of a successful selection: the theme that was active before
/// and the one that is active now.
pub struct Selection {
    pub previous: String,
    pub theme: String,
}

impl Selector<'_> {
    /// Returns the currently persisted theme name (trimmed, lowercased), or
    /// [`NO_THEME`] if the state file is missing or unreadable.
    pub fn current(&self) -> String {
        match fs::read_to_string(self.state_file) {
            Ok(contents) => {
                let name = contents.trim().to_lowercase();
                if name.is_empty() {
                    NO_THEME.to_owned()
                } else {
                    name
                }
            }
            Err(_) => NO_THEME.to_owned(),
        }
    }

    /// Returns the themes that can currently be selected, i.e. those whose
    /// compiled artifact exists.
    pub fn available(&self) -> BTreeSet<String> {
        discover::built(self.stylesheets_directory, self.artifact_suffix)
    }

    /// Whether `name` refers to the currently persisted theme. Compared
    /// case-insensitively, the same normalization [`Selector::select`]
    /// applies before persisting.
    pub fn is_active(&self, name: &str) -> bool {
        name.to_lowercase() == self.current()
    }

    /// Chooses and persists a theme. If `random` is set or no name was
    /// requested, picks uniformly at random from the available themes
    /// excluding the current one, so a random pick always actually changes
    /// the theme when more than one is built. Names are lowercased before
    /// comparison and persistence (artifact files themselves may be
    /// mixed-case), and the choice must name either a built theme or the
    /// current one. On success the choice is written to the state file
    /// (overwriting) and the old and new names are returned.
    pub fn select(&self, request: Option<&str>, random: bool) -> Result<Selection> {
        let current = self.current();
        let available: BTreeSet<String> = self
            .available()
            .iter()
            .map(|name| name.to_lowercase())
            .collect();

        let theme = match request {
            Some(name) if !random => name.to_lowercase(),
            _ => {
                let candidates: Vec<&String> =
                    available.iter().filter(|name| **name != current).collect();
                match candidates.choose(&mut rand::thread_rng()) {
                    Some(name) => (*name).clone(),
                    None => return Err(Error::NoThemes),
                }
            }
        };

        if theme != current && !available.contains(&theme) {
            return Err(Error::UnknownTheme(theme));
        }

        fs::write(self.state_file, format!("{}\n", theme))?;
        Ok(Selection {
            previous: current,
            theme,
        })
    }
}

/// The result of a fallible selection operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error selecting a theme.
#[derive(Debug)]
pub enum Error {
    /// Returned when the requested name matches neither a built theme nor
    /// the current one.
    UnknownTheme(String),

    /// Returned when a random pick was requested but there's nothing to pick
    /// from (no built themes other than the current one).
    NoThemes,

    /// Returned when the state file can't be written.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownTheme(name) => write!(
                f,
                "`{}` is not a built theme; run the `themes` command to see what can be selected",
                name
            ),
            Error::NoThemes => write!(
                f,
                "no built themes to choose from; run the `build` command first"
            ),
            Error::Io(err) => write!(f, "writing the theme state file: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownTheme(_) => None,
            Error::NoThemes => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator when writing the state file.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        css: PathBuf,
        state: PathBuf,
    }

    fn fixture(built: &[&str], current: Option<&str>) -> std::io::Result<Fixture> {
        let dir = tempfile::tempdir()?;
        let css = dir.path().join("css");
        fs::create_dir(&css)?;
        for name in built {
            File::create(css.join(format!("{}.min.css", name)))?;
        }
        let state = dir.path().join(".theme");
        if let Some(name) = current {
            fs::write(&state, format!("{}\n", name))?;
        }
        Ok(Fixture {
            _dir: dir,
            css,
            state,
        })
    }

    fn selector(f: &Fixture) -> Selector {
        Selector {
            stylesheets_directory: &f.css,
            artifact_suffix: ".min.css",
            state_file: &f.state,
        }
    }

    #[test]
    fn test_current_defaults_to_none() -> std::io::Result<()> {
        let f = fixture(&[], None)?;
        assert_eq!(NO_THEME, selector(&f).current());
        Ok(())
    }

    #[test]
    fn test_request_is_case_normalized() -> anyhow::Result<()> {
        let f = fixture(&["dark", "light"], Some("light"))?;
        let selection = selector(&f).select(Some("Dark"), false)?;
        assert_eq!("light", selection.previous);
        assert_eq!("dark", selection.theme);
        assert_eq!("dark\n", fs::read_to_string(&f.state)?);
        Ok(())
    }

    #[test]
    fn test_unknown_theme_rejected_and_state_untouched() -> std::io::Result<()> {
        let f = fixture(&["dark"], Some("dark"))?;
        let err = selector(&f).select(Some("neon"), false).err().unwrap();
        assert!(matches!(err, Error::UnknownTheme(_)));
        assert_eq!("dark\n", fs::read_to_string(&f.state)?);
        Ok(())
    }

    #[test]
    fn test_reselecting_current_is_allowed() -> anyhow::Result<()> {
        let f = fixture(&["dark"], Some("dark"))?;
        let selection = selector(&f).select(Some("dark"), false)?;
        assert_eq!("dark", selection.theme);
        Ok(())
    }

    #[test]
    fn test_random_never_repeats_current() -> anyhow::Result<()> {
        let f = fixture(&["dark", "light"], Some("dark"))?;
        // With two themes a random pick must flip to the other one every
        // time; run enough rounds to catch a biased or inclusive pick.
        for _ in 0..32 {
            let selection = selector(&f).select(None, true)?;
            assert_ne!(selection.previous, selection.theme);
        }
        Ok(())
    }

    #[test]
    fn test_random_pick_persists_lowercased_name() -> anyhow::Result<()> {
        let f = fixture(&["Dark"], None)?;
        let selection = selector(&f).select(None, true)?;
        assert_eq!("dark", selection.theme);
        assert_eq!("dark\n", fs::read_to_string(&f.state)?);
        Ok(())
    }

    #[test]
    fn test_random_excludes_current_across_case() -> std::io::Result<()> {
        // `Dark.min.css` persisted as `dark` must still count as the current
        // theme when the exclusion filter runs.
        let f = fixture(&["Dark"], Some("dark"))?;
        let err = selector(&f).select(None, true).err().unwrap();
        assert!(matches!(err, Error::NoThemes));
        Ok(())
    }

    #[test]
    fn test_active_check_is_case_insensitive() -> std::io::Result<()> {
        let f = fixture(&["Dark"], Some("dark"))?;
        assert!(selector(&f).is_active("Dark"));
        assert!(selector(&f).is_active("dark"));
        assert!(!selector(&f).is_active("light"));
        Ok(())
    }

    #[test]
    fn test_random_with_nothing_available() -> std::io::Result<()> {
        let f = fixture(&["dark"], Some("dark"))?;
        let err = selector(&f).select(None, true).err().unwrap();
        assert!(matches!(err, Error::NoThemes));
        Ok(())
    }

    #[test]
    fn test_random_flag_beats_explicit_request() -> anyhow::Result<()> {
        let f = fixture(&["dark", "light"], Some("light"))?;
        let selection = selector(&f).select(Some("light"), true)?;
        assert_eq!("dark", selection.theme);
        Ok(())
    }

    #[test]
    fn test_persisted_name_is_always_selectable() -> anyhow::Result<()> {
        // The invariant behind the state file: whatever ends up persisted is
        // either a built theme or the previously current name.
        let f = fixture(&["dark", "light", "neon"], Some("light"))?;
        for _ in 0..16 {
            let s = selector(&f);
            let current = s.current();
            let available = s.available();
            let selection = s.select(None, true)?;
            assert!(available.contains(&selection.theme) || selection.theme == current);
        }
        Ok(())
    }
}
