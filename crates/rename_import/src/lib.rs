extern crate import_resolver;
extern crate serde_json;

#[cfg(test)]
extern crate pretty_assertions;

#[cfg(test)]
extern crate test_tmpdir;

mod action;
mod cfg;
mod classify;
mod error;
mod ledger;
mod resolve;
mod session;
#[cfg(test)]
mod test;
mod visitor;

use import_resolver::NodeModulesResolver;
use logger_srcfile::SrcFileLogger;
use swc_ecma_ast::Module;
use swc_ecma_visit::VisitMutWith;

pub use action::{RewriteAction, SpecifierRewriter, SpecifierSite};
pub use cfg::{
    DependencyRootSet, NpmFileNameNormalizer, Platform, RenameImportJSONConfig,
    RenameImportOptions, RewriteContext, NODE_MODULES_DIR, NPM_OUTPUT_DIR,
};
pub use classify::{
    classify, ModuleClassifier, SpecifierClass, FRAMEWORK_INTERNAL_PACKAGE,
    FRAMEWORK_RUNTIME_PACKAGE,
};
pub use error::RenameImportError;
pub use ledger::RewriteLedger;
pub use resolve::{resolve_local, resolve_package, runtime_bypass_path, runtime_relative_path};
pub use session::RenameImportSession;
pub use visitor::RenameImportVisitor;

/// Rewrites every import, re-export and `require` specifier in `module`
/// for the output layout described by `ctx`.
///
/// On error the module may already be partially rewritten and should be
/// discarded.
pub fn rename_imports(
    module: &mut Module,
    ctx: &RewriteContext,
    ledger: &RewriteLedger,
    resolver: &NodeModulesResolver,
    logger: impl SrcFileLogger,
) -> Result<(), RenameImportError> {
    let rewriter = SpecifierRewriter::new(ctx, resolver, ledger);
    let mut visitor = RenameImportVisitor::new(rewriter, logger);
    module.visit_mut_with(&mut visitor);
    visitor.into_result()
}
