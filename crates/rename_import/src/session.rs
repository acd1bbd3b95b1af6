use std::path::{Path, PathBuf};

use anyhow::Context;
use import_resolver::NodeModulesResolver;
use logger::{Logger, StdioLogger};
use logger_srcfile::WrapFileLogger;
use rayon::prelude::*;
use swc_common::{
    comments::{Comments, SingleThreadedComments},
    sync::Lrc,
    SourceMap,
};
use swc_compiler_base::PrintArgs;
use swc_ecma_ast::Module;
use swc_utils_parse::parse_module_file;
use swc_utils_print::ast_to_str;
use tracing::debug;

use crate::{
    cfg::{RenameImportOptions, RewriteContext},
    error::RenameImportError,
    ledger::RewriteLedger,
    rename_imports,
};

/// One build's worth of rename-import state.
///
/// Owns the ledger, so every file transformed through the same session
/// sees the specifiers earlier files produced.
pub struct RenameImportSession<TLogger: Logger> {
    options: RenameImportOptions,
    resolver: NodeModulesResolver,
    ledger: RewriteLedger,
    logger: TLogger,
}

impl<TLogger: Logger> RenameImportSession<TLogger> {
    pub fn new(options: RenameImportOptions, logger: TLogger) -> Self {
        Self::with_resolver(options, NodeModulesResolver::default(), logger)
    }

    pub fn with_resolver(
        options: RenameImportOptions,
        resolver: NodeModulesResolver,
        logger: TLogger,
    ) -> Self {
        Self {
            options,
            resolver,
            ledger: RewriteLedger::new(),
            logger,
        }
    }

    pub fn options(&self) -> &RenameImportOptions {
        &self.options
    }

    pub fn ledger(&self) -> &RewriteLedger {
        &self.ledger
    }

    /// Rewrites an already parsed module. `cm` must be the source map the
    /// module was parsed into, so warnings can point at the source.
    pub fn transform_module(
        &self,
        cm: &Lrc<SourceMap>,
        module: &mut Module,
        ctx: &RewriteContext,
    ) -> Result<(), RenameImportError> {
        let file_logger = WrapFileLogger::new(cm.clone(), &self.logger);
        rename_imports(module, ctx, &self.ledger, &self.resolver, file_logger)
    }

    /// Parses, rewrites and prints one source file. The output location is
    /// derived from the configured source path.
    pub fn transform_source(
        &self,
        resource_path: &Path,
        src: &str,
    ) -> Result<String, RenameImportError> {
        let ctx = self.options.context_for_file(resource_path)?;
        self.transform_source_in(&ctx, src)
    }

    /// Like [`Self::transform_source`], with an explicit output location.
    pub fn transform_source_to(
        &self,
        resource_path: &Path,
        dist_source_path: &Path,
        src: &str,
    ) -> Result<String, RenameImportError> {
        let ctx = self
            .options
            .context_for_dist_file(resource_path, dist_source_path)?;
        self.transform_source_in(&ctx, src)
    }

    pub fn transform_file(&self, path: &Path) -> Result<String, RenameImportError> {
        let src = std::fs::read_to_string(path).map_err(|source| RenameImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.transform_source(path, &src)
    }

    fn transform_source_in(
        &self,
        ctx: &RewriteContext,
        src: &str,
    ) -> Result<String, RenameImportError> {
        let cm = Lrc::<SourceMap>::default();
        let comments = SingleThreadedComments::default();
        let mut module = parse_module_file(
            &cm,
            &ctx.resource_path,
            src,
            Some(&comments as &dyn Comments),
        )
        .map_err(|e| RenameImportError::Parse {
            file: ctx.resource_path.clone(),
            message: format!("{:?}", e.kind()),
        })?;

        self.transform_module(&cm, &mut module, ctx)?;

        let print_args = PrintArgs {
            comments: Some(&comments as &dyn Comments),
            ..Default::default()
        };
        ast_to_str(&cm, &module, print_args).map_err(|e| RenameImportError::Print {
            file: ctx.resource_path.clone(),
            message: format!("{:#}", e),
        })
    }
}

impl RenameImportSession<StdioLogger> {
    /// Session configured from the loader's JSON options, reporting
    /// diagnostics on stdout/stderr.
    pub fn from_json(config: &str) -> Result<Self, RenameImportError> {
        let options = RenameImportOptions::from_json(config)?;
        Ok(Self::new(options, StdioLogger::new()))
    }
}

impl<TLogger: Logger + Sync> RenameImportSession<TLogger> {
    /// Transforms `(path, source)` pairs in parallel, sharing this
    /// session's ledger. Fails with the first file that fails.
    pub fn transform_files(
        &self,
        files: Vec<(PathBuf, String)>,
    ) -> anyhow::Result<Vec<(PathBuf, String)>> {
        debug!("transforming {} files", files.len());
        files
            .into_par_iter()
            .map(|(path, src)| {
                let output = self
                    .transform_source(&path, &src)
                    .with_context(|| format!("while transforming {}", path.display()))?;
                Ok((path, output))
            })
            .collect()
    }
}
