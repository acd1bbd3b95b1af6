extern crate path_slash;

use path_slash::PathBufExt;
use std::{
    collections::HashMap,
    fs::File,
    io::{Error, Write},
    path::{Path, PathBuf},
};

/// A temporary directory populated with fixture files, removed on drop.
///
/// `root()` is canonicalized, so paths built from it compare equal to
/// paths a resolver produces after following symlinks (e.g. macOS
/// `/var` -> `/private/var`).
pub struct TmpDir {
    tmp_root: tempfile::TempDir,
    canonical_root: PathBuf,
}

/// Builds a `TmpDir` from `"relative/path" => "content"` pairs.
#[macro_export]
macro_rules! test_tmpdir(
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            use test_tmpdir::TmpDir;
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert(String::from($key), $value);
            )+

            TmpDir::new_with_content(&m)
        }
    };
);

impl Default for TmpDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TmpDir {
    pub fn new() -> TmpDir {
        let root = tempfile::tempdir().unwrap();
        let canonical_root = std::fs::canonicalize(&root).unwrap();
        TmpDir {
            tmp_root: root,
            canonical_root,
        }
    }

    pub fn new_with_content(content: &HashMap<String, &str>) -> TmpDir {
        let out = Self::new();
        out.write_batch(content).unwrap();
        out
    }

    pub fn write_batch(&self, content: &HashMap<String, &str>) -> Result<(), Error> {
        for (path, content) in content {
            self.write_file(path, content)?;
        }
        Ok(())
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<(), Error> {
        let target = self.tmp_root.path().join(PathBuf::from_slash(path));
        // mkdir -p
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(target)?;
        file.write_all(content.as_bytes())
    }

    pub fn remove_file(&self, path: &str) -> Result<(), Error> {
        std::fs::remove_file(self.tmp_root.path().join(PathBuf::from_slash(path)))
    }

    pub fn root(&self) -> &Path {
        &self.canonical_root
    }

    pub fn root_join<S: AsRef<str>>(&self, other: S) -> PathBuf {
        self.canonical_root
            .to_owned()
            .join(PathBuf::from_slash(other))
    }
}
