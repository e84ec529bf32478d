use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

pub fn read(path: &Path, kind: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| anyhow!("Reading {} file `{}`: {}", kind, path.display(), e))
}
