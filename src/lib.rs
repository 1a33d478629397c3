//! DLL dependency bundling for MinGW-built Windows binaries.
//!
//! Uses `objdump -p` to read PE import tables, walks the import graph
//! breadth-first and copies every library that Windows does not ship into a
//! bundle directory next to the executable. Runs on the Linux build host;
//! nothing is executed under Wine.

mod analyze;
mod classify;
mod closure;
mod config;
mod copy;
mod paths;

pub use analyze::{
    get_dll_imports, parse_objdump_output, ImportExtractor, Objdump, DEFAULT_OBJDUMP,
};
pub use classify::{SystemLibraries, API_SET_PREFIX, DEFAULT_SYSTEM_DLLS};
pub use closure::{gather_dependencies, BundleReport, Bundler, CopiedFile};
pub use config::{BundleConfig, DEFAULT_FORCE_INCLUDE, DEFAULT_SEARCH_PATH};
pub use copy::{copy_into, copy_preserving_metadata};
pub use paths::find_library;
