//! Test Registration Facade
//!
//! Suite-initialization entry points: each one derives the final test path
//! and forwards the registration to the execution engine. Malformed
//! identifiers abort here, before any test executes.

use tracing::debug;

use crate::engine::{DataCase, FixtureCase, TestEngine, TestFn};
use crate::path::TestPath;

/// Register a plain test function under its normalized identifier.
pub fn add_test<E: TestEngine>(engine: &mut E, identifier: &str, func: TestFn) {
    let path = TestPath::from_identifier(identifier);
    debug!(%path, "registering test");
    engine.add_test(&path, func);
}

/// Register a data-parameterized test function. The engine hands `data`
/// back to `func` at invocation.
pub fn add_data_test<E, D>(engine: &mut E, identifier: &str, data: D, func: fn(&D))
where
    E: TestEngine,
    D: Send + Sync + 'static,
{
    let path = TestPath::from_identifier(identifier);
    debug!(%path, "registering data test");
    engine.add_data_test(&path, DataCase::new(data, func));
}

/// Register a flavored variant of a data-parameterized test.
///
/// `base` is an already-normalized path and is not re-normalized; the
/// flavor is appended as a sub-path segment (an empty flavor registers
/// under `base` unchanged).
pub fn add_data_test_flavor<E, D>(
    engine: &mut E,
    base: &TestPath,
    flavor: &str,
    data: D,
    func: fn(&D),
) where
    E: TestEngine,
    D: Send + Sync + 'static,
{
    let path = base.with_flavor(flavor);
    debug!(%path, "registering data test");
    engine.add_data_test(&path, DataCase::new(data, func));
}

/// Register a fixture: setup, run and teardown sharing one context of type
/// `C`, allocated by the engine per scheduled invocation.
pub fn add_fixture<E, C, D>(
    engine: &mut E,
    identifier: &str,
    data: D,
    setup: fn(&mut C, &D),
    run: fn(&mut C, &D),
    teardown: fn(&mut C, &D),
) where
    E: TestEngine,
    C: Default + 'static,
    D: Send + Sync + 'static,
{
    let path = TestPath::from_identifier(identifier);
    debug!(%path, "registering fixture");
    engine.add_fixture_test(&path, FixtureCase::new(data, setup, run, teardown));
}

/// Flavored variant of [`add_fixture`]. Like [`add_data_test_flavor`],
/// `base` is taken as already normalized.
pub fn add_fixture_flavor<E, C, D>(
    engine: &mut E,
    base: &TestPath,
    flavor: &str,
    data: D,
    setup: fn(&mut C, &D),
    run: fn(&mut C, &D),
    teardown: fn(&mut C, &D),
) where
    E: TestEngine,
    C: Default + 'static,
    D: Send + Sync + 'static,
{
    let path = base.with_flavor(flavor);
    debug!(%path, "registering fixture");
    engine.add_fixture_test(&path, FixtureCase::new(data, setup, run, teardown));
}
