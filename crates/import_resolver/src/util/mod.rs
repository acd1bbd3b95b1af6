mod pkgname;

pub use pkgname::{package_name, split_package_import};
