use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("Cannot find module '{specifier}' (searched {searched:?})")]
    NotFound {
        specifier: String,
        searched: Vec<PathBuf>,
    },
    #[error("Failed to parse {path}: {source}")]
    PackageJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] abspath::Error),
}

impl ResolveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: path.into(),
            source,
        }
    }
}
