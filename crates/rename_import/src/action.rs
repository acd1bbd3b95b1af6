use import_resolver::NodeModulesResolver;
use tracing::debug;

use crate::{
    classify::SpecifierClass,
    error::RenameImportError,
    ledger::RewriteLedger,
    resolve::{resolve_local, resolve_package, runtime_bypass_path, runtime_relative_path},
    RewriteContext,
};

/// What to do with one specifier-bearing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteAction {
    Keep,
    ReplaceWith(String),
    /// Drop the whole declaration.
    Remove,
    /// Replace the whole `require(...)` call with `null`.
    ReplaceWithNull,
}

/// Where a specifier was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierSite {
    /// `import ... from 'x'`, `export ... from 'x'`
    Declaration,
    /// `require('x')`
    Require,
}

/// Decides the rewrite for a specifier. Holds no AST state; the visitor
/// applies the returned action.
pub struct SpecifierRewriter<'a> {
    ctx: &'a RewriteContext<'a>,
    resolver: &'a NodeModulesResolver,
    ledger: &'a RewriteLedger,
}

impl<'a> SpecifierRewriter<'a> {
    pub fn new(
        ctx: &'a RewriteContext<'a>,
        resolver: &'a NodeModulesResolver,
        ledger: &'a RewriteLedger,
    ) -> Self {
        Self {
            ctx,
            resolver,
            ledger,
        }
    }

    pub fn context(&self) -> &RewriteContext<'a> {
        self.ctx
    }

    pub fn rewrite(
        &self,
        specifier: &str,
        site: SpecifierSite,
    ) -> Result<RewriteAction, RenameImportError> {
        let options = self.ctx.options;
        let class = options.classifier.classify(specifier);
        let action = match class {
            SpecifierClass::PlatformExcluded => match site {
                SpecifierSite::Declaration => RewriteAction::Remove,
                SpecifierSite::Require => RewriteAction::ReplaceWithNull,
            },
            SpecifierClass::FrameworkRuntime => {
                let runtime_path = if options.disable_copy_npm {
                    runtime_bypass_path(options.classifier.internal_package(), options.platform)
                } else {
                    runtime_relative_path(self.ctx)?
                };
                self.record(runtime_path)
            }
            SpecifierClass::FrameworkInternal => {
                let runtime_path = if options.disable_copy_npm {
                    specifier.to_string()
                } else {
                    runtime_relative_path(self.ctx)?
                };
                self.record(runtime_path)
            }
            // dependencies are loaded from the platform's own npm support
            SpecifierClass::Package if options.disable_copy_npm => RewriteAction::Keep,
            SpecifierClass::Package => {
                let rewritten = resolve_package(specifier, self.ctx, self.resolver, self.ledger)?;
                self.record(rewritten)
            }
            // already emitted by an earlier rewrite
            SpecifierClass::Local
                if site == SpecifierSite::Require && self.ledger.is_rewritten(specifier) =>
            {
                RewriteAction::Keep
            }
            SpecifierClass::Local => RewriteAction::ReplaceWith(resolve_local(
                specifier,
                self.ctx,
                self.resolver,
            )?),
        };

        debug!(
            "{}: {site:?} {specifier:?} ({class:?}) -> {action:?}",
            self.ctx.resource_path.display()
        );
        Ok(action)
    }

    fn record(&self, rewritten: String) -> RewriteAction {
        self.ledger.mark_rewritten(rewritten.clone());
        RewriteAction::ReplaceWith(rewritten)
    }
}
