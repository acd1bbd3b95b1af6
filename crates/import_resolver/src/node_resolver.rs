//! Node-style module resolution against an explicit list of search roots.
//!
//! Follows the algorithm node uses for `require.resolve(specifier, { paths })`:
//! bare specifiers are looked up in the `node_modules` chain of every
//! search root, relative and absolute specifiers are resolved as a file
//! and then as a directory.

use path_clean::PathClean;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

use crate::package::PackageJson;
use crate::util;
use crate::ResolveError;

const NODE_MODULES: &str = "node_modules";
static PACKAGE: &str = "package.json";

static DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "json", "node"];
static DEFAULT_MAIN_FIELDS: &[&str] = &["main"];

#[derive(Debug, Clone)]
pub struct NodeModulesResolverOptions {
    /// Extensions appended, in order, when the exact path is not a file.
    pub extensions: Vec<String>,
    /// package.json fields consulted, in order, for a package's entry point.
    pub main_fields: Vec<String>,
    /// If true, do not resolve symlinks in the returned path.
    pub preserve_symlinks: bool,
}

impl Default for NodeModulesResolverOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            main_fields: DEFAULT_MAIN_FIELDS.iter().map(|s| s.to_string()).collect(),
            preserve_symlinks: false,
        }
    }
}

/// The `node_modules` directories node would search from `from`.
///
/// Every ancestor of `from` that is not itself a `node_modules` directory
/// contributes `<ancestor>/node_modules`, nearest first.
pub fn node_module_paths(from: &Path) -> Vec<PathBuf> {
    from.ancestors()
        .filter(|ancestor| ancestor.file_name().map_or(true, |name| name != NODE_MODULES))
        .map(|ancestor| ancestor.join(NODE_MODULES))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct NodeModulesResolver {
    options: NodeModulesResolverOptions,
}

impl NodeModulesResolver {
    pub fn new(options: NodeModulesResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NodeModulesResolverOptions {
        &self.options
    }

    fn wrap(&self, path: PathBuf) -> Result<PathBuf, ResolveError> {
        if self.options.preserve_symlinks {
            Ok(path.clean())
        } else {
            path.canonicalize().map_err(|e| ResolveError::io(path, e))
        }
    }

    /// Resolve a path as a file. If `path` refers to a file, it is returned;
    /// otherwise `path` + each extension is tried.
    pub fn resolve_as_file(&self, path: &Path) -> Option<PathBuf> {
        trace!("resolve_as_file({})", path.display());

        if path.is_file() {
            return Some(path.to_path_buf());
        }

        let name = path.file_name()?.to_string_lossy();
        let mut ext_path = path.to_path_buf();
        for ext in &self.options.extensions {
            ext_path.set_file_name(format!("{}.{}", name, ext));
            if ext_path.is_file() {
                return Some(ext_path);
            }
        }
        None
    }

    /// Resolve a path as a directory, using the entry fields of a
    /// package.json file if it exists, or the index.EXT file otherwise.
    pub fn resolve_as_directory(&self, path: &Path) -> Result<Option<PathBuf>, ResolveError> {
        trace!("resolve_as_directory({})", path.display());

        if !path.is_dir() {
            return Ok(None);
        }

        let pkg_path = path.join(PACKAGE);
        if pkg_path.is_file() {
            if let Some(main) = self.resolve_package_entry(path, &pkg_path)? {
                return Ok(Some(main));
            }
        }

        Ok(self.resolve_index(path))
    }

    fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
        self.options
            .extensions
            .iter()
            .map(|ext| dir.join(format!("index.{}", ext)))
            .find(|index_path| index_path.is_file())
    }

    /// Resolve the entry point named by the first present main field.
    fn resolve_package_entry(
        &self,
        pkg_dir: &Path,
        pkg_path: &Path,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let pkg = PackageJson::read(pkg_path)?;

        let entry = self
            .options
            .main_fields
            .iter()
            .find_map(|field| pkg.entry_field(field));

        if let Some(entry) = entry {
            let entry_path = pkg_dir.join(entry).clean();
            debug!(
                "package {} entry {:?} -> {}",
                pkg.name.as_deref().unwrap_or("<unnamed>"),
                entry,
                entry_path.display()
            );
            if let Some(file) = self.resolve_as_file(&entry_path) {
                return Ok(Some(file));
            }
            if entry_path.is_dir() {
                return Ok(self.resolve_index(&entry_path));
            }
        }

        Ok(None)
    }

    fn resolve_file_or_directory(&self, path: &Path) -> Result<Option<PathBuf>, ResolveError> {
        match self.resolve_as_file(path) {
            Some(file) => Ok(Some(file)),
            None => self.resolve_as_directory(path),
        }
    }

    /// Resolve a bare package specifier by probing the `node_modules`
    /// chains of `search_paths`, in the order given.
    pub fn resolve_package(
        &self,
        specifier: &str,
        search_paths: &[PathBuf],
    ) -> Result<PathBuf, ResolveError> {
        let package_import = util::split_package_import(specifier);
        if let Some((package, subpath)) = &package_import {
            debug!("resolving package {package:?} subpath {subpath:?}");
        }

        let mut searched: Vec<PathBuf> = Vec::new();
        for root in search_paths {
            for nm_dir in node_module_paths(root) {
                if searched.contains(&nm_dir) {
                    continue;
                }
                searched.push(nm_dir.clone());

                let candidate = match &package_import {
                    Some((package, subpath)) => {
                        let package_dir = nm_dir.join(package);
                        // skip directories that do not contain the package at all
                        if !package_dir.exists() {
                            continue;
                        }
                        match subpath.strip_prefix("./") {
                            Some(inner) => package_dir.join(inner),
                            None => package_dir,
                        }
                    }
                    None => nm_dir.join(specifier),
                };

                trace!("probing node_modules directory: {}", nm_dir.display());
                if let Some(result) = self.resolve_file_or_directory(&candidate)? {
                    debug!("resolved {specifier:?} to {}", result.display());
                    return self.wrap(result);
                }
            }
        }

        Err(ResolveError::NotFound {
            specifier: specifier.to_string(),
            searched,
        })
    }

    /// Resolve a relative or absolute specifier against `base_dir`.
    pub fn resolve_path(&self, base_dir: &Path, specifier: &str) -> Result<PathBuf, ResolveError> {
        let target = abspath::join_abspath(base_dir, specifier)?;
        // `./dir/` must resolve as a directory, never as `dir.js`
        let is_dir_specifier = specifier.ends_with('/')
            || matches!(
                Path::new(specifier).components().next_back(),
                Some(Component::CurDir | Component::ParentDir)
            );

        let resolved = if is_dir_specifier {
            self.resolve_as_directory(&target)?
        } else {
            self.resolve_file_or_directory(&target)?
        };

        match resolved {
            Some(result) => {
                debug!("resolved {specifier:?} to {}", result.display());
                self.wrap(result)
            }
            None => Err(ResolveError::NotFound {
                specifier: specifier.to_string(),
                searched: vec![target],
            }),
        }
    }
}
