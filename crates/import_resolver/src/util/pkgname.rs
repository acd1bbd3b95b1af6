/// Extracts the package name from a bare import specifier.
///
/// `react/lib/x` -> `react`, `@scope/pkg/sub` -> `@scope/pkg`.
/// Returns `None` for relative/absolute paths and for a scope with no
/// package segment.
pub fn package_name(import_specifier: &str) -> Option<&str> {
    if import_specifier.is_empty()
        || import_specifier.starts_with('.')
        || import_specifier.starts_with('/')
    {
        return None;
    }
    let idx = import_specifier
        .find('/')
        .unwrap_or(import_specifier.len());
    if import_specifier.starts_with('@') {
        let rest = &import_specifier[idx..];
        if rest.len() <= 1 {
            return None;
        }
        let end = rest[1..]
            .find('/')
            .map(|idx2| idx + 1 + idx2)
            .unwrap_or(import_specifier.len());
        Some(&import_specifier[..end])
    } else {
        Some(&import_specifier[..idx])
    }
}

/// Splits a bare specifier into its package name and the subpath inside
/// the package, normalized to start with `.`.
pub fn split_package_import(import_specifier: &str) -> Option<(&str, String)> {
    let pkg = package_name(import_specifier)?;
    let rest_str = &import_specifier[pkg.len()..];
    if rest_str.is_empty() {
        Some((pkg, ".".to_string()))
    } else {
        Some((pkg, format!(".{}", rest_str)))
    }
}
