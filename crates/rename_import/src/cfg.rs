use std::{
    fmt::{self, Debug, Display, Formatter},
    path::{Path, PathBuf},
    sync::Arc,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{classify::ModuleClassifier, error::RenameImportError};

/// Directory under the project root that third-party packages are installed into.
pub const NODE_MODULES_DIR: &str = "node_modules";
/// Directory under the output root that the npm copier mirrors packages into.
pub const NPM_OUTPUT_DIR: &str = "npm";

/// Target mini-program platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ali,
    Wechat,
    Bytedance,
    Baidu,
    Kuaishou,
    Quickapp,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ali => "ali",
            Platform::Wechat => "wechat",
            Platform::Bytedance => "bytedance",
            Platform::Baidu => "baidu",
            Platform::Kuaishou => "kuaishou",
            Platform::Quickapp => "quickapp",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hook applied to every computed npm path before it is emitted.
pub type NpmFileNameNormalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Candidate install locations for package specifiers, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRootSet(Vec<PathBuf>);

impl DependencyRootSet {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self(roots)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.0
    }

    /// Roots in search order: the last declared root is searched first,
    /// so a nested install shadows a hoisted one.
    pub fn search_order(&self) -> Vec<PathBuf> {
        self.0.iter().rev().cloned().collect()
    }
}

/// A JSON serializable proxy for [`RenameImportOptions`], shaped like the
/// loader options the build pipeline passes around.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameImportJSONConfig {
    // Directories that may contain installed packages
    pub node_modules_path_list: Vec<String>,
    // Project root; its node_modules is the root the npm mirror is laid out against
    pub root_context: String,
    // Root of the mini-program output
    pub output_path: String,
    // Source root, used to derive each file's output location
    #[serde(default)]
    pub source_path: Option<String>,
    pub platform: Platform,
    #[serde(default)]
    pub disable_copy_npm: bool,
    #[serde(default)]
    pub runtime_package: Option<String>,
    #[serde(default)]
    pub internal_package: Option<String>,
}

impl RenameImportJSONConfig {
    /// JSON schema of the loader options, for validating config files
    /// before they reach the build.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RenameImportJSONConfig)
    }
}

/// Build-level configuration, shared read-only by every file's transform.
#[derive(Clone)]
pub struct RenameImportOptions {
    pub dependency_roots: DependencyRootSet,
    pub root_context: PathBuf,
    pub output_path: PathBuf,
    pub source_path: Option<PathBuf>,
    pub platform: Platform,
    pub disable_copy_npm: bool,
    pub classifier: ModuleClassifier,
    normalize_npm_file_name: NpmFileNameNormalizer,
}

impl Debug for RenameImportOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenameImportOptions")
            .field("dependency_roots", &self.dependency_roots)
            .field("root_context", &self.root_context)
            .field("output_path", &self.output_path)
            .field("source_path", &self.source_path)
            .field("platform", &self.platform)
            .field("disable_copy_npm", &self.disable_copy_npm)
            .field("classifier", &self.classifier)
            .field("normalize_npm_file_name", &"<fn>".to_owned())
            .finish()
    }
}

fn require_absolute(name: &str, path: PathBuf) -> Result<PathBuf, RenameImportError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(RenameImportError::InvalidConfig(format!(
            "{name} must be an absolute path, got {}",
            path.display()
        )))
    }
}

impl RenameImportOptions {
    pub fn new(
        root_context: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        dependency_roots: Vec<PathBuf>,
        platform: Platform,
    ) -> Result<Self, RenameImportError> {
        let dependency_roots = dependency_roots
            .into_iter()
            .map(|root| require_absolute("nodeModulesPathList entry", root))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            dependency_roots: DependencyRootSet::new(dependency_roots),
            root_context: require_absolute("rootContext", root_context.into())?,
            output_path: require_absolute("outputPath", output_path.into())?,
            source_path: None,
            platform,
            disable_copy_npm: false,
            classifier: ModuleClassifier::default(),
            normalize_npm_file_name: Arc::new(|s: &str| s.to_string()),
        })
    }

    pub fn from_json(config: &str) -> Result<Self, RenameImportError> {
        let json: RenameImportJSONConfig = serde_json::from_str(config)
            .map_err(|e| RenameImportError::InvalidConfig(e.to_string()))?;
        json.try_into()
    }

    pub fn with_source_path(
        mut self,
        source_path: impl Into<PathBuf>,
    ) -> Result<Self, RenameImportError> {
        self.source_path = Some(require_absolute("sourcePath", source_path.into())?);
        Ok(self)
    }

    pub fn with_disable_copy_npm(mut self, disable_copy_npm: bool) -> Self {
        self.disable_copy_npm = disable_copy_npm;
        self
    }

    pub fn with_classifier(mut self, classifier: ModuleClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_npm_file_name_normalizer(
        mut self,
        normalizer: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.normalize_npm_file_name = Arc::new(normalizer);
        self
    }

    pub fn normalize_npm_file_name(&self, path: &str) -> String {
        (self.normalize_npm_file_name)(path)
    }

    /// `<rootContext>/node_modules`, the root npm-relative paths are measured from.
    pub fn node_modules_root(&self) -> PathBuf {
        self.root_context.join(NODE_MODULES_DIR)
    }

    /// `<outputPath>/npm`, where the copier places dependency files.
    pub fn npm_output_root(&self) -> PathBuf {
        self.output_path.join(NPM_OUTPUT_DIR)
    }

    /// Builds the per-file context, deriving the output location from
    /// `source_path`: `<outputPath>/<resource relative to sourcePath>`.
    pub fn context_for_file(
        &self,
        resource_path: impl Into<PathBuf>,
    ) -> Result<RewriteContext<'_>, RenameImportError> {
        let resource_path = require_absolute("resource path", resource_path.into())?;
        let source_path = self.source_path.as_ref().ok_or_else(|| {
            RenameImportError::InvalidConfig(format!(
                "sourcePath is not configured, so the output location of {} must be given explicitly",
                resource_path.display()
            ))
        })?;
        let relative = abspath::relative_slash_path(source_path, &resource_path)?;
        let dist_source_path = abspath::join_abspath(&self.output_path, relative)?;
        Ok(RewriteContext {
            options: self,
            resource_path,
            dist_source_path,
        })
    }

    /// Builds the per-file context with an explicit output location.
    pub fn context_for_dist_file(
        &self,
        resource_path: impl Into<PathBuf>,
        dist_source_path: impl Into<PathBuf>,
    ) -> Result<RewriteContext<'_>, RenameImportError> {
        Ok(RewriteContext {
            options: self,
            resource_path: require_absolute("resource path", resource_path.into())?,
            dist_source_path: require_absolute("dist source path", dist_source_path.into())?,
        })
    }
}

impl TryFrom<RenameImportJSONConfig> for RenameImportOptions {
    type Error = RenameImportError;
    fn try_from(value: RenameImportJSONConfig) -> Result<Self, Self::Error> {
        let mut classifier = ModuleClassifier::default();
        if let Some(runtime_package) = value.runtime_package {
            classifier = classifier.with_runtime_package(runtime_package);
        }
        if let Some(internal_package) = value.internal_package {
            classifier = classifier.with_internal_package(internal_package);
        }

        let options = RenameImportOptions::new(
            value.root_context,
            value.output_path,
            value
                .node_modules_path_list
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            value.platform,
        )?
        .with_disable_copy_npm(value.disable_copy_npm)
        .with_classifier(classifier);

        match value.source_path {
            Some(source_path) => options.with_source_path(source_path),
            None => Ok(options),
        }
    }
}

/// Everything the rewrite of one file needs. Immutable for the duration
/// of that file's transform.
#[derive(Debug, Clone)]
pub struct RewriteContext<'a> {
    pub options: &'a RenameImportOptions,
    /// Absolute path of the source file being transformed.
    pub resource_path: PathBuf,
    /// Absolute path the transformed file will be written to.
    pub dist_source_path: PathBuf,
}

impl RewriteContext<'_> {
    pub fn resource_dir(&self) -> &Path {
        abspath::parent_dir(&self.resource_path)
    }

    pub fn dist_dir(&self) -> &Path {
        abspath::parent_dir(&self.dist_source_path)
    }
}
