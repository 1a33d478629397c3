//! Classification of libraries the target platform always provides.

use std::collections::HashSet;

/// Prefix of the Windows API-set stub libraries, resolved by the loader.
pub const API_SET_PREFIX: &str = "api-ms-win";

/// Standard Windows DLLs that must never be bundled.
pub const DEFAULT_SYSTEM_DLLS: &[&str] = &[
    "advapi32.dll",
    "bcrypt.dll",
    "comctl32.dll",
    "comdlg32.dll",
    "crypt32.dll",
    "dbghelp.dll",
    "dwmapi.dll",
    "gdi32.dll",
    "gdiplus.dll",
    "imm32.dll",
    "iphlpapi.dll",
    "kernel32.dll",
    "msimg32.dll",
    "msvcrt.dll",
    "normaliz.dll",
    "ole32.dll",
    "oleaut32.dll",
    "opengl32.dll",
    "powrprof.dll",
    "psapi.dll",
    "rpcrt4.dll",
    "secur32.dll",
    "setupapi.dll",
    "shell32.dll",
    "shlwapi.dll",
    "ucrtbase.dll",
    "user32.dll",
    "userenv.dll",
    "usp10.dll",
    "uxtheme.dll",
    "version.dll",
    "winmm.dll",
    "winnls.dll",
    "ws2_32.dll",
    "wsock32.dll",
    "d3d9.dll",
    "dxgi.dll",
    "d3d11.dll",
    "dwrite.dll",
    "ncrypt.dll",
    "dnsapi.dll",
];

/// Table of system-provided library names plus a stub-library prefix.
#[derive(Debug, Clone)]
pub struct SystemLibraries {
    names: HashSet<String>,
    prefix: String,
}

impl SystemLibraries {
    /// Build a classifier from a name table and a stub prefix.
    ///
    /// Names and prefix are lowercased here so lookups only lowercase the query.
    pub fn new<I, S>(names: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
            prefix: prefix.to_lowercase(),
        }
    }

    /// True if `name` is guaranteed present on the target and must not be bundled.
    #[must_use]
    pub fn is_system_provided(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.names.contains(&lower) || (!self.prefix.is_empty() && lower.starts_with(&self.prefix))
    }
}

impl Default for SystemLibraries {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_DLLS.iter().copied(), API_SET_PREFIX)
    }
}
