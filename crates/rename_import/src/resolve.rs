//! Path arithmetic between the source tree, the npm mirror in the output
//! tree, and the output location of the file being transformed.

use std::path::{Path, PathBuf};

use abspath::{canonicalize_existing, ensure_relative_marker, join_abspath, relative_slash_path};
use import_resolver::NodeModulesResolver;
use tracing::{debug, trace};

use crate::{cfg::Platform, error::RenameImportError, ledger::RewriteLedger, RewriteContext};

/// Runtime build used when dependency copying is disabled and the runtime
/// is loaded from the platform's own npm support.
pub fn runtime_bypass_path(internal_package: &str, platform: Platform) -> String {
    format!("{internal_package}/dist/{internal_package}.{platform}.esm")
}

/// Path from the current file's output directory to the mirrored runtime
/// package, `<outputPath>/npm/<runtime>`. Computed, not probed on disk.
pub fn runtime_relative_path(ctx: &RewriteContext) -> Result<String, RenameImportError> {
    let runtime_dir = ctx
        .options
        .npm_output_root()
        .join(ctx.options.classifier.internal_package());
    let relative = relative_slash_path(ctx.dist_dir(), runtime_dir)?;
    Ok(ensure_relative_marker(&relative))
}

/// Rewrites a bare package specifier to the location its entry file will
/// occupy in the output npm mirror, relative to the current file's
/// output directory.
///
/// The entry file is found by searching the dependency roots last-declared
/// first. A successful lookup is remembered in `ledger`, and later
/// rewrites of the same specifier reuse it without touching the
/// filesystem.
pub fn resolve_package(
    specifier: &str,
    ctx: &RewriteContext,
    resolver: &NodeModulesResolver,
    ledger: &RewriteLedger,
) -> Result<String, RenameImportError> {
    let target = match ledger.package_target(specifier) {
        Some(target) => {
            trace!("ledger hit for package {specifier:?}");
            target
        }
        None => {
            let search_paths = ctx.options.dependency_roots.search_order();
            let target = resolver
                .resolve_package(specifier, &search_paths)
                .map_err(|source| RenameImportError::Resolution {
                    specifier: specifier.to_string(),
                    file: ctx.resource_path.clone(),
                    source,
                })?;
            ledger.remember_package_target(specifier, target.clone());
            target
        }
    };

    let node_modules_root = comparable_base(&ctx.options.node_modules_root(), resolver);
    let mirror_relative = relative_slash_path(node_modules_root, &target)?;
    let mirrored = join_abspath(ctx.options.npm_output_root(), mirror_relative)?;
    let relative = relative_slash_path(ctx.dist_dir(), mirrored)?;
    let rewritten = ctx
        .options
        .normalize_npm_file_name(&ensure_relative_marker(&relative));

    debug!(
        "{}: package {specifier:?} -> {rewritten:?}",
        ctx.resource_path.display()
    );
    Ok(rewritten)
}

/// Rewrites a local specifier to an explicit relative path naming the
/// concrete file it resolves to, e.g. `./utils` -> `./utils/index.js`.
///
/// Some mini-program runtimes cannot resolve an omitted extension or an
/// implicit `index` file the way node does.
pub fn resolve_local(
    specifier: &str,
    ctx: &RewriteContext,
    resolver: &NodeModulesResolver,
) -> Result<String, RenameImportError> {
    let base_dir = ctx.resource_dir();
    let target = resolver
        .resolve_path(base_dir, specifier)
        .map_err(|source| RenameImportError::Resolution {
            specifier: specifier.to_string(),
            file: ctx.resource_path.clone(),
            source,
        })?;
    let relative = relative_slash_path(comparable_base(base_dir, resolver), target)?;
    Ok(ensure_relative_marker(&relative))
}

// Resolved targets have their symlinks followed, so the base they are
// measured from must be too.
fn comparable_base(path: &Path, resolver: &NodeModulesResolver) -> PathBuf {
    if resolver.options().preserve_symlinks {
        path.to_path_buf()
    } else {
        canonicalize_existing(path)
    }
}
