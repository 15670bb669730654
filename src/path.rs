//! Test Path Normalization
//!
//! This module derives hierarchical test paths from test function
//! identifiers, and combines them with flavor suffixes for parameterized
//! test variants.

use std::fmt;

/// Reserved prefix every test identifier must carry.
pub const TEST_PREFIX: &str = "test_";

/// A hierarchical test path, the key the execution engine indexes tests by.
///
/// Always begins with `/`. Uniqueness across registrations is the engine's
/// concern, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestPath(String);

impl TestPath {
    /// Derive a path from a test function identifier.
    ///
    /// The identifier must start with `test_`; anything else is an
    /// authoring error and aborts immediately. The first four characters
    /// are dropped and the leftover leading character becomes `/`.
    ///
    /// Note: only that single leading character is converted. Underscores
    /// later in the identifier are kept verbatim, so `test_shape_basic`
    /// maps to `/shape_basic`, not `/shape/basic`. Path-based filtering in
    /// the engine depends on this literal output.
    pub fn from_identifier(identifier: &str) -> Self {
        assert!(
            identifier.starts_with(TEST_PREFIX),
            "test identifier {identifier:?} does not start with {TEST_PREFIX:?}"
        );
        let mut path = String::with_capacity(identifier.len() - 4);
        path.push('/');
        path.push_str(&identifier[TEST_PREFIX.len()..]);
        TestPath(path)
    }

    /// Wrap an already-normalized path, e.g. a base path for flavored
    /// registration. Must start with `/`.
    pub fn from_normalized(path: impl Into<String>) -> Self {
        let path = path.into();
        assert!(
            path.starts_with('/'),
            "test path {path:?} does not start with '/'"
        );
        TestPath(path)
    }

    /// Combine with a flavor suffix.
    ///
    /// An empty flavor leaves the path unchanged; otherwise the result is
    /// `base/flavor`.
    pub fn with_flavor(&self, flavor: &str) -> Self {
        if flavor.is_empty() {
            self.clone()
        } else {
            TestPath(format!("{}/{}", self.0, flavor))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
