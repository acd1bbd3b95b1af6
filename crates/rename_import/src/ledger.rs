use std::path::PathBuf;

use dashmap::{DashMap, DashSet};

/// Build-session record of the specifiers this pass has already produced.
///
/// Owned by whoever drives the build and shared by reference with every
/// file's transform. Entries are never removed. Both tables are
/// concurrent, so one ledger can back files transformed in parallel.
#[derive(Debug, Default)]
pub struct RewriteLedger {
    // rewritten specifier values emitted so far
    rewritten: DashSet<String>,
    // package specifier -> resolved entry file
    package_targets: DashMap<String, PathBuf>,
}

impl RewriteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_rewritten(&self, specifier: impl Into<String>) {
        self.rewritten.insert(specifier.into());
    }

    /// True if `specifier` is a value an earlier rewrite emitted.
    pub fn is_rewritten(&self, specifier: &str) -> bool {
        self.rewritten.contains(specifier)
    }

    pub fn len(&self) -> usize {
        self.rewritten.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewritten.is_empty()
    }

    pub(crate) fn package_target(&self, specifier: &str) -> Option<PathBuf> {
        self.package_targets
            .get(specifier)
            .map(|entry| entry.value().clone())
    }

    pub(crate) fn remember_package_target(&self, specifier: &str, target: PathBuf) {
        self.package_targets.insert(specifier.to_string(), target);
    }
}
