use serde::Deserialize;
use std::path::Path;

use crate::ResolveError;

/// Subset of package.json used during file resolution.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    // Only the string form of "browser" names an entry point; the object
    // form is a rewrite map and is ignored here.
    #[serde(default)]
    pub browser: Option<serde_json::Value>,
}

impl PackageJson {
    pub fn read(path: &Path) -> Result<Self, ResolveError> {
        let file = std::fs::File::open(path).map_err(|e| ResolveError::io(path, e))?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
            ResolveError::PackageJson {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Value of the named entry field, if present and a string.
    pub fn entry_field(&self, field: &str) -> Option<&str> {
        match field {
            "main" => self.main.as_deref(),
            "module" => self.module.as_deref(),
            "browser" => self.browser.as_ref().and_then(|b| b.as_str()),
            _ => None,
        }
    }
}
