use std::path::PathBuf;

use import_resolver::ResolveError;

#[derive(thiserror::Error, Debug)]
pub enum RenameImportError {
    /// A package or local specifier could not be found on disk. Fatal for
    /// the file being transformed.
    #[error("Cannot resolve '{specifier}' from {}: {source}", .file.display())]
    Resolution {
        specifier: String,
        file: PathBuf,
        #[source]
        source: ResolveError,
    },
    #[error("Failed to parse {}: {message}", .file.display())]
    Parse { file: PathBuf, message: String },
    #[error("Failed to print {}: {message}", .file.display())]
    Print { file: PathBuf, message: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Path(#[from] abspath::Error),
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
