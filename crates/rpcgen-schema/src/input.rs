//! Loading definition files from disk.

use crate::def::GenDef;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of definition files.
pub const DEFINITION_EXTENSION: &str = ".yml";

/// Parse a single definition file.
pub fn load_definition(path: &Path) -> Result<GenDef> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    GenDef::from_yaml_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `*.yml` file under `folder`, recursively, in lexical path order.
pub fn definition_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(folder).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            Error::Read { path, source }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .ends_with(DEFINITION_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Load every definition file under `folder`.
pub fn load_folder(folder: &Path) -> Result<Vec<GenDef>> {
    let files = definition_files(folder)?;
    tracing::debug!(folder = %folder.display(), count = files.len(), "loading definitions");
    files.iter().map(|path| load_definition(path)).collect()
}
