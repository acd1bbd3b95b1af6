extern crate path_clean;
#[cfg(test)]
extern crate pretty_assertions;
extern crate serde;
extern crate serde_json;
#[cfg(test)]
extern crate test_tmpdir;
extern crate tracing;
#[cfg(test)]
extern crate tracing_test;

mod error;
pub mod node_resolver;
mod package;
pub mod util;

pub use error::ResolveError;
pub use node_resolver::{node_module_paths, NodeModulesResolver, NodeModulesResolverOptions};
pub use package::PackageJson;
