//! File-system backed resolver
//!
//! Precedence for a bare specifier, relative to the working context:
//!
//! 1. an existing directory
//! 2. an existing suite file
//! 3. the name with `.yaml` or `.yml` appended
//! 4. a dotted package name, `a.b` -> `a/b` or `+a/+b`
//!
//! A trailing `:case` keeps only the case with that name.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::suite::{is_suite_file, load_suite};
use super::SpecifierResolver;
use crate::error::{Result, RunError};
use crate::models::TestCollection;

/// Explicit directory that specifiers are resolved against
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingContext {
    pub dir: PathBuf,
}

impl WorkingContext {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Context for the process working directory
    pub fn current() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }
}

/// Resolves specifiers to suite files on disk
#[derive(Clone, Debug)]
pub struct FsResolver {
    context: WorkingContext,
    recursive: bool,
}

impl FsResolver {
    pub fn new(context: WorkingContext) -> Self {
        Self {
            context,
            recursive: false,
        }
    }

    /// Scan subdirectories as well
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Load every suite file in a directory, sorted by file name
    fn scan_dir(&self, name: &str, dir: &Path) -> Result<TestCollection> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut collection = TestCollection::new(name, dir);

        let walker = WalkDir::new(dir)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()));

        for entry in walker {
            let entry = entry.map_err(|err| RunError::SuiteRead {
                path: err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: err.into(),
            })?;
            if entry.file_type().is_file() && is_suite_file(entry.path()) {
                debug!("Found suite file {}", entry.path().display());
                collection.append(load_suite(entry.path())?);
            }
        }

        Ok(collection)
    }

    /// Resolve the part of a specifier before any `:case` selector
    fn resolve_container(&self, specifier: &str) -> Result<Option<TestCollection>> {
        let path = self.context.dir.join(specifier);

        if path.is_dir() {
            return self.scan_dir(specifier, &path).map(Some);
        }
        if path.is_file() && is_suite_file(&path) {
            return load_suite(&path).map(Some);
        }
        for ext in ["yaml", "yml"] {
            let candidate = self.context.dir.join(format!("{specifier}.{ext}"));
            if candidate.is_file() {
                return load_suite(&candidate).map(Some);
            }
        }
        for dir in package_dirs(specifier) {
            let dir = self.context.dir.join(dir);
            if dir.is_dir() {
                return self.scan_dir(specifier, &dir).map(Some);
            }
        }

        Ok(None)
    }
}

impl SpecifierResolver for FsResolver {
    fn resolve_default(&self) -> Result<TestCollection> {
        let dir = &self.context.dir;
        self.scan_dir(&dir.display().to_string(), dir)
    }

    fn resolve_one(&self, name: &str) -> Result<TestCollection> {
        let (container, selector) = split_selector(name);
        let unresolved = || RunError::UnresolvedSpecifier(name.to_string());

        let mut collection = self.resolve_container(container)?.ok_or_else(unresolved)?;

        if let Some(case) = selector {
            collection.components.retain(|c| c.name == case);
            if collection.is_empty() {
                return Err(unresolved());
            }
            collection.name = name.to_string();
        }

        Ok(collection)
    }

    fn working_dir(&self) -> &Path {
        &self.context.dir
    }
}

/// Split `container:case`. A colon followed by a path separator, as in a
/// Windows drive prefix, is not a selector.
fn split_selector(specifier: &str) -> (&str, Option<&str>) {
    if let Some((container, case)) = specifier.rsplit_once(':') {
        if !container.is_empty() && !case.is_empty() && !case.contains(['/', '\\']) {
            return (container, Some(case));
        }
    }
    (specifier, None)
}

/// Candidate directories for a dotted package name
fn package_dirs(specifier: &str) -> Vec<PathBuf> {
    let parts: Vec<&str> = specifier.split('.').collect();
    let valid = parts.len() > 1
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_alphanumeric() || c == '_'));
    if !valid {
        return Vec::new();
    }

    let plain: PathBuf = parts.iter().collect();
    let plus: PathBuf = parts.iter().map(|p| format!("+{p}")).collect();
    vec![plain, plus]
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
