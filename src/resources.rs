//! Test Resource Location
//!
//! Resolves test-relative resource paths (fonts, expected outputs) against
//! a process-wide source root.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the source root at run time, the
/// automake spelling build environments already export.
pub const SRCDIR_VAR: &str = "srcdir";

/// Uppercase fallback consulted when [`SRCDIR_VAR`] is unset. The same
/// name is consulted at compile time via `option_env!` as the baked-in
/// default for installed test binaries.
pub const SRCDIR_VAR_FALLBACK: &str = "SRCDIR";

lazy_static::lazy_static! {
    static ref SOURCE_ROOT: PathBuf = compute_source_root();
}

fn compute_source_root() -> PathBuf {
    let runtime = env::var(SRCDIR_VAR)
        .or_else(|_| env::var(SRCDIR_VAR_FALLBACK))
        .ok();
    select_source_root(runtime, option_env!("SRCDIR"))
}

/// Pick the source root from a runtime override, a compile-time default,
/// and finally the current directory marker.
fn select_source_root(runtime: Option<String>, baked: Option<&str>) -> PathBuf {
    if let Some(dir) = runtime {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Some(dir) = baked {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from(".")
}

/// Base directory relative resource paths resolve against.
///
/// Computed once per process behind a one-time-initialization barrier, so
/// the cached value is safe to read even if the engine dispatches tests
/// concurrently.
pub fn source_root() -> &'static Path {
    &SOURCE_ROOT
}

/// Resolve a resource path: absolute input is returned unchanged, relative
/// input is joined with the source root exactly once.
pub fn resolve_resource_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        source_root().join(path)
    }
}
