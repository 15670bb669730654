//! Test Harness for the Shaper Test Suite
//!
//! This crate provides the registration, fixture-lifecycle, resource and
//! binary-comparison infrastructure shared by every test in the shaping
//! test suite: hierarchical test paths derived from function identifiers,
//! flavored (parameterized) variants, setup/run/teardown fixtures over a
//! typed context, byte-exact blob assertions with offset diagnostics, and
//! loading of font fixture files resolved against a source root.

pub mod compare;
pub mod engine;
pub mod error;
pub mod font;
pub mod path;
pub mod register;
pub mod resources;

pub use compare::{assert_blobs_equal, diff_blobs, ByteDiff};
pub use engine::{CaseOutcome, DataCase, FixtureCase, HarnessRegistry, RunSummary, TestEngine};
pub use error::{HarnessError, Result};
pub use font::{open_font_file, open_font_file_with_index, Blob, Face, FaceBuilder, Tag};
pub use path::{TestPath, TEST_PREFIX};
pub use register::{
    add_data_test, add_data_test_flavor, add_fixture, add_fixture_flavor, add_test,
};
pub use resources::{resolve_resource_path, source_root};

/// Common test utilities
pub mod utils {
    use std::path::{Path, PathBuf};

    /// Get the path to the crate's test fixtures directory
    pub fn fixtures_dir() -> PathBuf {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        PathBuf::from(manifest_dir).join("fixtures")
    }

    /// Read a font fixture file
    pub fn read_test_font<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<u8>> {
        let full_path = fixtures_dir().join(path);
        Ok(std::fs::read(full_path)?)
    }

    /// Create a temporary directory for test outputs
    pub fn create_test_output_dir() -> anyhow::Result<tempfile::TempDir> {
        Ok(tempfile::tempdir()?)
    }

}
