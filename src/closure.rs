//! Transitive DLL closure: walk the import graph and fill the bundle directory.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::{ImportExtractor, Objdump};
use crate::config::BundleConfig;
use crate::copy::{bundle_destination, copy_into};
use crate::paths::find_library;

/// Why a name is in the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// From the force-include list. Best effort, a miss is not reported.
    ForceInclude,
    /// Declared in an import table.
    Import,
}

#[derive(Debug)]
struct Seed {
    name: String,
    origin: Origin,
}

/// A library that was resolved and copied during this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    /// Name as requested (import table or force-include list).
    pub name: String,
    /// Resolved file in the search path.
    pub source: PathBuf,
    /// Copy inside the bundle directory.
    pub destination: PathBuf,
    /// True if it entered the walk through the force-include list.
    pub forced: bool,
}

/// Outcome of a [`Bundler::gather`] run.
#[derive(Debug, Default)]
pub struct BundleReport {
    pub copied: Vec<CopiedFile>,
    /// Resolved libraries whose destination already existed.
    pub already_present: Vec<PathBuf>,
    /// System-provided names that were skipped.
    pub system: Vec<String>,
    /// Imported names that could not be found in the search path.
    pub missing: Vec<String>,
    /// Files whose import table could not be read.
    pub unreadable: Vec<PathBuf>,
}

impl BundleReport {
    /// True if every imported library was found and every import table read.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unreadable.is_empty()
    }
}

/// Computes the dependency closure of a binary and copies it into a directory.
pub struct Bundler<E> {
    config: BundleConfig,
    extractor: E,
}

impl<E: ImportExtractor> Bundler<E> {
    pub fn new(config: BundleConfig, extractor: E) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Copy every non-system library `root` needs (transitively) into `output_dir`.
    ///
    /// The frontier is seeded with the force-include list followed by the
    /// root's own imports; both go through the same resolve/copy pipeline.
    /// Missing libraries and unreadable import tables are logged and recorded
    /// in the report, they do not fail the run.
    ///
    /// # Errors
    ///
    /// Returns an error if `output_dir` cannot be created or a copy fails.
    pub fn gather(&self, root: &Path, output_dir: &Path) -> Result<BundleReport> {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;

        let mut walk = Walk {
            bundler: self,
            output_dir,
            processed: HashSet::new(),
            frontier: VecDeque::new(),
            report: BundleReport::default(),
        };

        for name in &self.config.force_include {
            walk.frontier.push_back(Seed {
                name: name.clone(),
                origin: Origin::ForceInclude,
            });
        }

        log::info!(
            "Gathering dependencies for {} into {}",
            root.display(),
            output_dir.display()
        );
        for name in walk.imports_of(root) {
            walk.frontier.push_back(Seed {
                name,
                origin: Origin::Import,
            });
        }

        walk.run()?;
        Ok(walk.report)
    }
}

/// Mutable state of one traversal.
struct Walk<'a, E> {
    bundler: &'a Bundler<E>,
    output_dir: &'a Path,
    /// Lowercased names whose resolution was already attempted.
    processed: HashSet<String>,
    frontier: VecDeque<Seed>,
    report: BundleReport,
}

impl<E: ImportExtractor> Walk<'_, E> {
    fn run(&mut self) -> Result<()> {
        while let Some(seed) = self.frontier.pop_front() {
            self.visit(seed)?;
        }
        Ok(())
    }

    fn visit(&mut self, seed: Seed) -> Result<()> {
        let bundler = self.bundler;
        let config = &bundler.config;
        let key = seed.name.to_lowercase();

        if self.processed.contains(&key) {
            return Ok(());
        }
        if config.system.is_system_provided(&seed.name) {
            self.processed.insert(key);
            self.report.system.push(seed.name);
            return Ok(());
        }

        let Some(src) = find_library(&config.search_path, &seed.name) else {
            match seed.origin {
                Origin::Import => {
                    self.processed.insert(key);
                    log::warn!("Could not find {}", seed.name);
                    self.report.missing.push(seed.name);
                }
                Origin::ForceInclude => {
                    // Left unmarked so a real import of this name still gets reported
                    log::debug!("Force-include {} not present, skipping", seed.name);
                }
            }
            return Ok(());
        };
        self.processed.insert(key);

        // The resolved file name can differ in case from the requested one
        if let Some(file_name) = src.file_name() {
            self.processed.insert(file_name.to_string_lossy().to_lowercase());
        }

        let Some(dest) = copy_into(&src, self.output_dir)? else {
            // Its imports were walked when it was first copied
            let dest = bundle_destination(&src, self.output_dir)?;
            self.report.already_present.push(dest);
            return Ok(());
        };

        match seed.origin {
            Origin::ForceInclude => log::info!("Force included core library: {}", seed.name),
            Origin::Import => log::info!("Bundled {}", display_name(&dest)),
        }

        for name in self.imports_of(&src) {
            if !self.processed.contains(&name.to_lowercase()) {
                self.frontier.push_back(Seed {
                    name,
                    origin: Origin::Import,
                });
            }
        }

        self.report.copied.push(CopiedFile {
            name: seed.name,
            source: src,
            destination: dest,
            forced: seed.origin == Origin::ForceInclude,
        });
        Ok(())
    }

    /// Imports of `path`, or nothing if its import table cannot be read.
    fn imports_of(&mut self, path: &Path) -> BTreeSet<String> {
        match self.bundler.extractor.imports(path) {
            Ok(imports) => imports,
            Err(e) => {
                log::warn!("Error checking {}: {:#}", path.display(), e);
                self.report.unreadable.push(path.to_path_buf());
                BTreeSet::new()
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Bundle the dependencies of `root` using the default MinGW configuration.
pub fn gather_dependencies(root: &Path, output_dir: &Path) -> Result<BundleReport> {
    Bundler::new(BundleConfig::default(), Objdump::default()).gather(root, output_dir)
}
