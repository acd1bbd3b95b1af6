use lazy_static::lazy_static;
use regex::Regex;

/// UI-framework package whose imports are redirected to the mini-program runtime.
pub const FRAMEWORK_RUNTIME_PACKAGE: &str = "rax";
/// The mini-program runtime itself.
pub const FRAMEWORK_INTERNAL_PACKAGE: &str = "jsx2mp-runtime";

lazy_static! {
    // weex modules have no mini-program implementation at all
    static ref PLATFORM_EXCLUDED_RE: Regex =
        Regex::new(r"^@(weex-module|weex-project)/").expect("platform exclusion pattern is valid");
    static ref DEFAULT_CLASSIFIER: ModuleClassifier = ModuleClassifier::default();
}

/// The kind of module a specifier names. Exactly one applies to any string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecifierClass {
    /// `./x`, `../x`, `/abs/x`
    Local,
    /// A package family the target platform cannot ship.
    PlatformExcluded,
    /// The UI framework, e.g. `rax` or `rax/lib/x`.
    FrameworkRuntime,
    /// The mini-program runtime package.
    FrameworkInternal,
    /// Any other bare specifier.
    Package,
}

/// Classifies specifiers against a set of known package names.
#[derive(Debug, Clone)]
pub struct ModuleClassifier {
    runtime_package: String,
    internal_package: String,
    excluded: Regex,
}

impl Default for ModuleClassifier {
    fn default() -> Self {
        Self {
            runtime_package: FRAMEWORK_RUNTIME_PACKAGE.to_string(),
            internal_package: FRAMEWORK_INTERNAL_PACKAGE.to_string(),
            excluded: PLATFORM_EXCLUDED_RE.clone(),
        }
    }
}

impl ModuleClassifier {
    pub fn new(
        runtime_package: impl Into<String>,
        internal_package: impl Into<String>,
        excluded: Regex,
    ) -> Self {
        Self {
            runtime_package: runtime_package.into(),
            internal_package: internal_package.into(),
            excluded,
        }
    }

    pub fn with_runtime_package(mut self, name: impl Into<String>) -> Self {
        self.runtime_package = name.into();
        self
    }

    pub fn with_internal_package(mut self, name: impl Into<String>) -> Self {
        self.internal_package = name.into();
        self
    }

    pub fn runtime_package(&self) -> &str {
        &self.runtime_package
    }

    pub fn internal_package(&self) -> &str {
        &self.internal_package
    }

    /// Classes are tested in declaration order of [`SpecifierClass`]; the
    /// first match wins, so exclusion beats a runtime-name overlap.
    pub fn classify(&self, specifier: &str) -> SpecifierClass {
        if is_local(specifier) {
            SpecifierClass::Local
        } else if self.excluded.is_match(specifier) {
            SpecifierClass::PlatformExcluded
        } else if is_scoped_under(specifier, &self.runtime_package) {
            SpecifierClass::FrameworkRuntime
        } else if is_scoped_under(specifier, &self.internal_package) {
            SpecifierClass::FrameworkInternal
        } else {
            SpecifierClass::Package
        }
    }
}

/// Classifies with the default package names.
pub fn classify(specifier: &str) -> SpecifierClass {
    DEFAULT_CLASSIFIER.classify(specifier)
}

fn is_local(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/')
}

// `name` itself or any subpath of it, but not `name-suffix`
fn is_scoped_under(specifier: &str, name: &str) -> bool {
    match specifier.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use regex::Regex;

    use super::{classify, ModuleClassifier, SpecifierClass};

    #[test]
    fn test_local() {
        assert_eq!(classify("./utils/x"), SpecifierClass::Local);
        assert_eq!(classify("../x"), SpecifierClass::Local);
        assert_eq!(classify("/abs/x"), SpecifierClass::Local);
        assert_eq!(classify("."), SpecifierClass::Local);
    }

    #[test]
    fn test_platform_excluded() {
        assert_eq!(classify("@weex-module/modal"), SpecifierClass::PlatformExcluded);
        assert_eq!(classify("@weex-project/x/y"), SpecifierClass::PlatformExcluded);
        assert_eq!(classify("@weex-modules/modal"), SpecifierClass::Package);
        assert_eq!(classify("weex-module/modal"), SpecifierClass::Package);
    }

    #[test]
    fn test_runtime_packages() {
        assert_eq!(classify("rax"), SpecifierClass::FrameworkRuntime);
        assert_eq!(classify("rax/lib/hooks"), SpecifierClass::FrameworkRuntime);
        assert_eq!(classify("rax-view"), SpecifierClass::Package);
        assert_eq!(classify("jsx2mp-runtime"), SpecifierClass::FrameworkInternal);
        assert_eq!(
            classify("jsx2mp-runtime/dist/jsx2mp-runtime.wechat.esm"),
            SpecifierClass::FrameworkInternal
        );
        assert_eq!(classify("jsx2mp-runtime-x"), SpecifierClass::Package);
    }

    #[test]
    fn test_package() {
        assert_eq!(classify("some-pkg/lib/x"), SpecifierClass::Package);
        assert_eq!(classify("@scope/pkg/sub"), SpecifierClass::Package);
    }

    #[test]
    fn test_exclusion_wins_over_runtime_name() {
        let classifier = ModuleClassifier::default()
            .with_runtime_package("@weex-module/rax")
            .with_internal_package("@weex-module/rax");
        assert_eq!(
            classifier.classify("@weex-module/rax"),
            SpecifierClass::PlatformExcluded
        );
    }

    #[test]
    fn test_custom_registry() {
        let classifier = ModuleClassifier::new(
            "react",
            "my-runtime",
            Regex::new(r"^@native/").unwrap(),
        );
        assert_eq!(classifier.classify("react"), SpecifierClass::FrameworkRuntime);
        assert_eq!(classifier.classify("rax"), SpecifierClass::Package);
        assert_eq!(classifier.classify("my-runtime/x"), SpecifierClass::FrameworkInternal);
        assert_eq!(classifier.classify("@native/camera"), SpecifierClass::PlatformExcluded);
        assert_eq!(classifier.classify("@weex-module/modal"), SpecifierClass::Package);
    }
}
