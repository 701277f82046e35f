//! Generator options, read from `rpcgen.yml`.
//!
//! Example:
//! ```yaml
//! folder: defs
//! outputFolder: api
//! go:
//!   package: api
//!   fiberImport: github.com/gofiber/fiber/v2
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "rpcgen.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Directory holding the definition files.
    pub folder: PathBuf,
    /// Output directory; its name is also the output file stem.
    pub output_folder: PathBuf,
    /// Explicit output file, overriding `<outputFolder>/<outputFolder>.go`.
    #[serde(default)]
    pub output_file: Option<PathBuf>,
    pub go: GoOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoOptions {
    /// Package clause of the generated file.
    pub package: String,
    /// Import path of the Fiber web framework, quoted or not.
    pub fiber_import: String,
}

impl Options {
    /// Load options from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Where the generated file goes.
    ///
    /// Without `outputFile` this is `<outputFolder>/<outputFolder>.<extension>`:
    /// the folder path doubles as the file stem.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        if let Some(file) = &self.output_file {
            return file.clone();
        }
        let mut stem = self.output_folder.clone().into_os_string();
        stem.push(".");
        stem.push(extension);
        self.output_folder.join(stem)
    }
}

impl GoOptions {
    pub fn new(package: impl Into<String>, fiber_import: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            fiber_import: fiber_import.into(),
        }
    }

    /// The import path as a Go string literal.
    pub fn quoted_fiber_import(&self) -> String {
        let path = self.fiber_import.trim();
        if path.len() >= 2 && path.starts_with('"') && path.ends_with('"') {
            path.to_string()
        } else {
            format!("\"{path}\"")
        }
    }
}
