//! Specifier resolution
//!
//! Turns an ordered list of specifiers into one merged [`TestCollection`].
//! Lookup of a single specifier is delegated to a [`SpecifierResolver`],
//! so the merge rules here hold for any backing store.

mod fs;
mod suite;

pub use fs::{FsResolver, WorkingContext};
pub use suite::{is_suite_file, load_suite, CaseDef, SuiteFile};

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::models::TestCollection;

/// Looks up test collections by name
pub trait SpecifierResolver {
    /// Collection for the working context when no names are given
    fn resolve_default(&self) -> Result<TestCollection>;

    /// Collection for a single specifier
    fn resolve_one(&self, name: &str) -> Result<TestCollection>;

    /// Directory specifiers are resolved against
    fn working_dir(&self) -> &Path;
}

/// Resolve zero or more specifiers into one collection
///
/// With two or more names the components of each resolved collection
/// are concatenated in input order. Duplicates are kept.
pub fn resolve(names: &[String], resolver: &dyn SpecifierResolver) -> Result<TestCollection> {
    match names {
        [] => {
            debug!("Resolving tests from {}", resolver.working_dir().display());
            resolver.resolve_default()
        }
        [name] => {
            debug!("Resolving {}", name);
            resolver.resolve_one(name)
        }
        _ => {
            let mut merged = TestCollection::new(names.join(", "), resolver.working_dir());
            for name in names {
                debug!("Resolving {}", name);
                let collection = resolver.resolve_one(name)?;
                debug!("  {} -> {} tests", name, collection.len());
                merged.append(collection);
            }
            Ok(merged)
        }
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use super::SpecifierResolver;
    use crate::error::{Result, RunError};
    use crate::models::{TestCollection, TestComponent};

    /// In-memory resolver for tests
    pub struct StubResolver {
        pub dir: PathBuf,
        pub default: Vec<TestComponent>,
        pub named: HashMap<String, Vec<TestComponent>>,
    }

    impl StubResolver {
        pub fn new() -> Self {
            Self {
                dir: PathBuf::from("/work"),
                default: Vec::new(),
                named: HashMap::new(),
            }
        }

        /// Register `name` with cases `name1..=nameN`, each running `command`
        pub fn with_suite(mut self, name: &str, count: usize, command: &str) -> Self {
            let cases = (1..=count)
                .map(|i| TestComponent::new(name, format!("{name}{i}"), command))
                .collect();
            self.named.insert(name.to_string(), cases);
            self
        }

        pub fn with_default(mut self, cases: Vec<TestComponent>) -> Self {
            self.default = cases;
            self
        }
    }

    impl SpecifierResolver for StubResolver {
        fn resolve_default(&self) -> Result<TestCollection> {
            Ok(TestCollection::new(self.dir.display().to_string(), &self.dir)
                .with_components(self.default.clone()))
        }

        fn resolve_one(&self, name: &str) -> Result<TestCollection> {
            let cases = self
                .named
                .get(name)
                .ok_or_else(|| RunError::UnresolvedSpecifier(name.to_string()))?;
            Ok(TestCollection::new(name, self.dir.join(name)).with_components(cases.clone()))
        }

        fn working_dir(&self) -> &Path {
            &self.dir
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubResolver;
    use super::*;
    use crate::error::RunError;
    use crate::models::TestComponent;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn ids(collection: &TestCollection) -> Vec<String> {
        collection.components.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_empty_names_use_default() {
        let resolver = StubResolver::new().with_default(vec![TestComponent::new("here", "t", "true")]);
        let collection = resolve(&[], &resolver).unwrap();
        assert_eq!(collection, resolver.resolve_default().unwrap());
    }

    #[test]
    fn test_single_name_is_direct() {
        let resolver = StubResolver::new().with_suite("moduleA", 2, "true");
        let collection = resolve(&names(&["moduleA"]), &resolver).unwrap();
        assert_eq!(collection, resolver.resolve_one("moduleA").unwrap());
    }

    #[test]
    fn test_many_names_concatenate_in_order() {
        let resolver = StubResolver::new()
            .with_suite("moduleA", 2, "true")
            .with_suite("moduleB", 3, "true");

        let collection = resolve(&names(&["moduleA", "moduleB"]), &resolver).unwrap();
        assert_eq!(
            ids(&collection),
            vec!["moduleA1", "moduleA2", "moduleB1", "moduleB2", "moduleB3"]
        );
        assert_eq!(collection.location, resolver.dir);

        let reversed = resolve(&names(&["moduleB", "moduleA"]), &resolver).unwrap();
        assert_eq!(
            ids(&reversed),
            vec!["moduleB1", "moduleB2", "moduleB3", "moduleA1", "moduleA2"]
        );
    }

    #[test]
    fn test_duplicates_are_not_removed() {
        let resolver = StubResolver::new().with_suite("a", 1, "true");
        let collection = resolve(&names(&["a", "a"]), &resolver).unwrap();
        assert_eq!(ids(&collection), vec!["a1", "a1"]);
    }

    #[test]
    fn test_unresolved_name_aborts() {
        let resolver = StubResolver::new().with_suite("a", 1, "true");
        let err = resolve(&names(&["a", "missing", "a"]), &resolver).unwrap_err();
        assert!(matches!(err, RunError::UnresolvedSpecifier(ref n) if n == "missing"));
    }
}
