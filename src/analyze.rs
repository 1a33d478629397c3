//! PE import table analysis using objdump.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

/// Default objdump from the Fedora MinGW cross toolchain.
pub const DEFAULT_OBJDUMP: &str = "x86_64-w64-mingw32-objdump";

/// Source of the DLL names a file imports.
///
/// The closure walk only ever asks "what does this file import?", so tests
/// can substitute a fake (any `Fn(&Path) -> Result<BTreeSet<String>>` works).
pub trait ImportExtractor {
    /// Return the library names declared in the import table of `path`.
    fn imports(&self, path: &Path) -> Result<BTreeSet<String>>;
}

impl<F> ImportExtractor for F
where
    F: Fn(&Path) -> Result<BTreeSet<String>>,
{
    fn imports(&self, path: &Path) -> Result<BTreeSet<String>> {
        self(path)
    }
}

/// Import extractor that shells out to `objdump -p`.
///
/// objdump reads the PE headers directly, so this works on a Linux build host
/// without Wine or the target loader.
#[derive(Debug, Clone)]
pub struct Objdump {
    tool: String,
}

impl Objdump {
    /// Use a specific objdump binary (name on `PATH` or full path).
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl Default for Objdump {
    fn default() -> Self {
        Self::with_tool(DEFAULT_OBJDUMP)
    }
}

impl ImportExtractor for Objdump {
    fn imports(&self, path: &Path) -> Result<BTreeSet<String>> {
        get_dll_imports(&self.tool, path)
    }
}

/// Extract the DLL imports of a PE binary by running `<tool> -p`.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The objdump tool cannot be started (install mingw64-binutils)
/// - objdump exits unsuccessfully, e.g. the file is not a PE image
#[must_use = "library imports should be processed"]
pub fn get_dll_imports(tool: &str, binary_path: &Path) -> Result<BTreeSet<String>> {
    if !binary_path.exists() {
        bail!("File does not exist: {}", binary_path.display());
    }

    let output = Command::new(tool)
        .arg("-p")
        .arg(binary_path)
        .output()
        .with_context(|| format!("{} command not found - install mingw64-binutils", tool))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{} failed on {}: {}",
            tool,
            binary_path.display(),
            stderr.trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_objdump_output(&stdout))
}

/// Parse `objdump -p` output into the set of imported DLL names.
///
/// Example objdump output:
/// ```text
/// The Import Tables (interpreted .idata section contents)
///  vma:            Hint    Time      Forward  DLL       First
///                  Table   Stamp     Chain    Name      Thunk
///  00012000       0001203c 00000000 00000000 00012a5c 000121f4
///
/// 	DLL Name: KERNEL32.dll
/// 	vma:  Hint/Ord Member-Name Bound-To
/// ```
pub fn parse_objdump_output(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("DLL Name:"))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
