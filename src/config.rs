//! Run configuration: where libraries live and which ones are special.

use std::path::PathBuf;

use crate::classify::SystemLibraries;

/// DLL directory of the Fedora MinGW cross environment.
pub const DEFAULT_SEARCH_PATH: &str = "/usr/x86_64-w64-mingw32/sys-root/mingw/bin";

/// Toolchain runtime libraries that are needed even when no import table
/// names them (they can be loaded implicitly), plus alternatives that
/// only exist on some toolchain versions.
pub const DEFAULT_FORCE_INCLUDE: &[&str] = &[
    "libstdc++-6.dll",
    "libwinpthread-1.dll",
    "libgcc_s_seh-1.dll",
    "libtiff-5.dll",
    "libtiff-6.dll",
];

/// Everything the closure walk needs besides the import extractor.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Directory that libraries are resolved against.
    pub search_path: PathBuf,
    /// Libraries the target platform provides.
    pub system: SystemLibraries,
    /// Libraries bundled whenever they exist in `search_path`, in order.
    pub force_include: Vec<String>,
}

impl BundleConfig {
    pub fn with_search_path(mut self, search_path: impl Into<PathBuf>) -> Self {
        self.search_path = search_path.into();
        self
    }

    pub fn with_system(mut self, system: SystemLibraries) -> Self {
        self.system = system;
        self
    }

    pub fn with_force_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_include = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            search_path: PathBuf::from(DEFAULT_SEARCH_PATH),
            system: SystemLibraries::default(),
            force_include: DEFAULT_FORCE_INCLUDE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BundleConfig::default();
        assert_eq!(config.search_path, PathBuf::from(DEFAULT_SEARCH_PATH));
        assert_eq!(config.force_include[0], "libstdc++-6.dll");
        assert!(config.system.is_system_provided("user32.dll"));
    }

    #[test]
    fn test_overrides() {
        let config = BundleConfig::default()
            .with_search_path("/opt/mingw/bin")
            .with_force_include(["runtime.dll"])
            .with_system(SystemLibraries::new(Vec::<String>::new(), ""));
        assert_eq!(config.search_path, PathBuf::from("/opt/mingw/bin"));
        assert_eq!(config.force_include, vec!["runtime.dll".to_string()]);
        assert!(!config.system.is_system_provided("user32.dll"));
    }
}
