use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The file-name suffix for compiled stylesheet artifacts.
pub const ARTIFACT_SUFFIX: &str = ".min.css";

/// The SASS entry file every theme directory must contain.
pub const SOURCE_ENTRY: &str = "theme.scss";

/// Flags passed to the compiler ahead of the source and destination paths.
pub const COMPILER_FLAGS: &[&str] = &["--no-source-map", "--style=compressed"];

#[derive(Deserialize)]
struct ThemesDirectory(PathBuf);
impl Default for ThemesDirectory {
    fn default() -> Self {
        ThemesDirectory(PathBuf::from("themes"))
    }
}

#[derive(Deserialize)]
struct StylesheetsDirectory(PathBuf);
impl Default for StylesheetsDirectory {
    fn default() -> Self {
        StylesheetsDirectory(PathBuf::from("static/css"))
    }
}

#[derive(Deserialize)]
struct StateFile(PathBuf);
impl Default for StateFile {
    fn default() -> Self {
        StateFile(PathBuf::from(".theme"))
    }
}

#[derive(Deserialize)]
struct CompilerProgram(String);
impl Default for CompilerProgram {
    fn default() -> Self {
        CompilerProgram(String::from("sass"))
    }
}

#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    themes_directory: ThemesDirectory,

    #[serde(default)]
    stylesheets_directory: StylesheetsDirectory,

    #[serde(default)]
    state_file: StateFile,

    #[serde(default)]
    compiler: CompilerProgram,
}

pub struct Config {
    pub themes_directory: PathBuf,
    pub stylesheets_directory: PathBuf,
    pub state_file: PathBuf,
    pub compiler: String,
}

impl Config {
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join("themer.yaml");
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `themer.yaml` in any parent directory"
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = crate::util::read(path, "project")?;
        // An empty project file is fine; every field has a default.
        let project: Project = if contents.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(&contents)?
        };
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config {
                themes_directory: project_root.join(project.themes_directory.0),
                stylesheets_directory: project_root.join(project.stylesheets_directory.0),
                state_file: project_root.join(project.state_file.0),
                compiler: project.compiler.0,
            }),
        }
    }

    /// The SASS entry file for `theme`, i.e. `{themes_directory}/{theme}/theme.scss`.
    pub fn source_entry(&self, theme: &str) -> PathBuf {
        self.themes_directory.join(theme).join(SOURCE_ENTRY)
    }

    /// The artifact path for `theme`, i.e. `{stylesheets_directory}/{theme}.min.css`.
    pub fn artifact(&self, theme: &str) -> PathBuf {
        self.stylesheets_directory
            .join(format!("{}{}", theme, ARTIFACT_SUFFIX))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_resolve_against_project_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("themer.yaml"), "")?;

        let config = Config::from_project_file(&dir.path().join("themer.yaml"))?;
        assert_eq!(dir.path().join("themes"), config.themes_directory);
        assert_eq!(dir.path().join("static/css"), config.stylesheets_directory);
        assert_eq!(dir.path().join(".theme"), config.state_file);
        assert_eq!("sass", config.compiler);
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_upward() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("themer.yaml"),
            "stylesheets_directory: frontend/static/css\ncompiler: dart-sass\n",
        )?;
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(
            dir.path().join("frontend/static/css"),
            config.stylesheets_directory
        );
        assert_eq!("dart-sass", config.compiler);
        Ok(())
    }

    #[test]
    fn test_artifact_and_source_entry_paths() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("themer.yaml"), "")?;
        let config = Config::from_project_file(&dir.path().join("themer.yaml"))?;

        assert_eq!(
            dir.path().join("themes/dark/theme.scss"),
            config.source_entry("dark")
        );
        assert_eq!(
            dir.path().join("static/css/dark.min.css"),
            config.artifact("dark")
        );
        Ok(())
    }
}
