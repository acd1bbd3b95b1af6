use path_clean::PathClean;
use path_slash::PathBufExt;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Base path is not absolute: {0}")]
    BasePathNotAbsolute(PathBuf),
    #[error("Cannot express {to} relative to {from}")]
    NoRelativePath { from: PathBuf, to: PathBuf },
    #[error("Path is not valid unicode: {0}")]
    NonUnicode(PathBuf),
}

pub fn join_abspath(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let base = base.as_ref();
    let path = path.as_ref();
    if !base.is_absolute() {
        return Err(Error::BasePathNotAbsolute(base.to_path_buf()));
    }

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path).to_path_buf()
    }
    .clean();

    Ok(absolute_path)
}

/// Directory containing `file`. The root is its own parent.
pub fn parent_dir(file: &Path) -> &Path {
    file.parent().unwrap_or(file)
}

/// Path from the directory `from` to `to`, as a forward-slash string.
///
/// Both paths are cleaned first, so `a/./b/../c` and `a/c` produce the
/// same result. An empty result (the two paths are equal) is returned
/// as `""`.
pub fn relative_slash_path(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<String, Error> {
    let from = from.as_ref().to_path_buf().clean();
    let to = to.as_ref().to_path_buf().clean();
    let diff = pathdiff::diff_paths(&to, &from).ok_or_else(|| Error::NoRelativePath {
        from: from.clone(),
        to: to.clone(),
    })?;
    let slash = diff.to_slash().map(|s| s.into_owned());
    slash.ok_or(Error::NonUnicode(diff))
}

/// Follows symlinks in the longest prefix of `path` that exists on disk.
/// The remaining components are appended unchanged, so paths to files
/// that are not written yet still compare against resolved paths.
pub fn canonicalize_existing(path: &Path) -> PathBuf {
    let cleaned = path.to_path_buf().clean();
    let mut existing = cleaned.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }
    cleaned
}

/// Prefixes `./` unless `path` already starts with a relative-path marker.
pub fn ensure_relative_marker(path: &str) -> String {
    if path == "." || path == ".." || path.starts_with("./") || path.starts_with("../") {
        path.to_owned()
    } else {
        format!("./{}", path)
    }
}
