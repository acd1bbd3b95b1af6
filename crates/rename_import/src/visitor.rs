use logger_srcfile::SrcFileLogger;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, ExportAll, Expr, ImportDecl, Lit, ModuleDecl, ModuleItem, NamedExport,
    Null, Str,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::{
    action::{RewriteAction, SpecifierRewriter, SpecifierSite},
    error::RenameImportError,
};

/// The node an action is applied to.
enum RewriteTarget<'n> {
    /// Source string of an import or re-export declaration.
    Declaration(&'n mut Str),
    /// A whole `require(...)` expression.
    Require(&'n mut Expr),
}

/// Argument shape of a `require` call.
enum RequireArgument {
    Literal(String),
    Unanalyzable,
}

/// AST visitor that rewrites the specifiers of import declarations,
/// re-export declarations and `require` calls in place.
///
/// VisitMut callbacks cannot fail, so the first resolution error is kept
/// and every later node is left alone. See [`Self::into_result`].
pub struct RenameImportVisitor<'a, TLogger: SrcFileLogger> {
    rewriter: SpecifierRewriter<'a>,
    logger: TLogger,
    error: Option<RenameImportError>,
}

impl<'a, TLogger: SrcFileLogger> RenameImportVisitor<'a, TLogger> {
    pub fn new(rewriter: SpecifierRewriter<'a>, logger: TLogger) -> Self {
        Self {
            rewriter,
            logger,
            error: None,
        }
    }

    pub fn into_result(self) -> Result<(), RenameImportError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn decide(&mut self, specifier: &str, site: SpecifierSite) -> RewriteAction {
        if self.error.is_some() {
            return RewriteAction::Keep;
        }
        match self.rewriter.rewrite(specifier, site) {
            Ok(action) => action,
            Err(err) => {
                self.error = Some(err);
                RewriteAction::Keep
            }
        }
    }

    fn rewrite_declaration(&mut self, src: &mut Str) -> bool {
        let specifier = src.value.to_string();
        let action = self.decide(&specifier, SpecifierSite::Declaration);
        apply(action, RewriteTarget::Declaration(src))
    }

    /// Handles `expr` if it is a `require` call. Returns false if it is not.
    fn rewrite_require(&mut self, expr: &mut Expr) -> bool {
        let (span, argument) = match require_call(expr) {
            Some(call) => call,
            None => return false,
        };
        let action = match argument {
            RequireArgument::Literal(specifier) => self.decide(&specifier, SpecifierSite::Require),
            RequireArgument::Unanalyzable => {
                if self.error.is_some() {
                    return true;
                }
                let snippet = self
                    .logger
                    .src_snippet(&span)
                    .unwrap_or_else(|| "require(<expression>)".to_string());
                self.logger.src_warn(
                    &span,
                    format!(
                        "Critical requirement of \"{snippet}\" cannot be resolved statically and has been replaced with null"
                    ),
                );
                RewriteAction::ReplaceWithNull
            }
        };
        apply(action, RewriteTarget::Require(expr));
        true
    }
}

/// Applies `action` to `target`. Returns false if the enclosing
/// declaration must be dropped.
fn apply(action: RewriteAction, target: RewriteTarget<'_>) -> bool {
    match (action, target) {
        (RewriteAction::Keep, _) => true,
        (RewriteAction::ReplaceWith(rewritten), RewriteTarget::Declaration(src)) => {
            *src = Str {
                span: src.span,
                value: rewritten.into(),
                raw: None,
            };
            true
        }
        (RewriteAction::Remove | RewriteAction::ReplaceWithNull, RewriteTarget::Declaration(_)) => {
            false
        }
        (RewriteAction::ReplaceWith(rewritten), RewriteTarget::Require(expr)) => {
            if let Expr::Call(call) = expr {
                if let Some(arg) = call.args.first_mut() {
                    arg.expr = Box::new(Expr::Lit(Lit::Str(Str {
                        span: arg.expr.span(),
                        value: rewritten.into(),
                        raw: None,
                    })));
                }
            }
            true
        }
        (RewriteAction::Remove | RewriteAction::ReplaceWithNull, RewriteTarget::Require(expr)) => {
            let span = match expr {
                Expr::Call(call) => call.span,
                _ => Span::default(),
            };
            *expr = Expr::Lit(Lit::Null(Null { span }));
            true
        }
    }
}

/// Recognizes `require(arg)` with exactly one non-spread argument.
fn require_call(expr: &Expr) -> Option<(Span, RequireArgument)> {
    let call: &CallExpr = match expr {
        Expr::Call(call) => call,
        _ => return None,
    };
    let is_require = match &call.callee {
        Callee::Expr(callee) => matches!(&**callee, Expr::Ident(ident) if &*ident.sym == "require"),
        _ => false,
    };
    if !is_require || call.args.len() != 1 || call.args[0].spread.is_some() {
        return None;
    }

    let mut arg = &*call.args[0].expr;
    while let Expr::Paren(paren) = arg {
        arg = &*paren.expr;
    }
    let argument = match arg {
        Expr::Lit(Lit::Str(value)) => RequireArgument::Literal(value.value.to_string()),
        _ => RequireArgument::Unanalyzable,
    };
    Some((call.span, argument))
}

impl<TLogger: SrcFileLogger> VisitMut for RenameImportVisitor<'_, TLogger> {
    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        let old_items = std::mem::take(items);
        items.reserve(old_items.len());
        for mut item in old_items {
            let keep = match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl { ref mut src, .. }))
                | ModuleItem::ModuleDecl(ModuleDecl::ExportAll(ExportAll { ref mut src, .. }))
                | ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(NamedExport {
                    src: Some(ref mut src),
                    ..
                })) => self.rewrite_declaration(src),
                _ => {
                    item.visit_mut_with(self);
                    true
                }
            };
            if keep {
                items.push(item);
            }
        }
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if !self.rewrite_require(expr) {
            expr.visit_mut_children_with(self);
        }
    }
}
