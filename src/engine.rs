//! Execution Engine Interface
//!
//! The harness registers tests against an external execution engine that
//! owns the run loop, scheduling and reporting. This module defines the
//! narrow interface the harness consumes, plus `HarnessRegistry`, a minimal
//! sequential engine used by the suite's own test binaries.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::path::TestPath;

/// A plain test function.
pub type TestFn = fn();

/// Type-erased user data attached to a registration, handed back to the
/// function at invocation time.
pub type TestData = Arc<dyn Any + Send + Sync>;

type ErasedDataFn = Box<dyn Fn(&(dyn Any + Send + Sync))>;
type ErasedFixtureFn = Box<dyn Fn(&mut dyn Any, &(dyn Any + Send + Sync))>;

/// A data-parameterized registration.
pub struct DataCase {
    pub(crate) data: TestData,
    pub(crate) func: ErasedDataFn,
}

impl DataCase {
    pub fn new<D>(data: D, func: fn(&D)) -> Self
    where
        D: Send + Sync + 'static,
    {
        DataCase {
            data: Arc::new(data),
            func: Box::new(move |data: &(dyn Any + Send + Sync)| {
                let data = data
                    .downcast_ref::<D>()
                    .expect("user data type mismatch at dispatch");
                func(data)
            }),
        }
    }
}

/// A fixture registration: three phases sharing one context block.
///
/// The engine allocates the context before setup, passes the same instance
/// by exclusive reference through setup, run and teardown on one thread,
/// and drops it on every exit path.
pub struct FixtureCase {
    pub(crate) data: TestData,
    pub(crate) new_context: Box<dyn Fn() -> Box<dyn Any>>,
    pub(crate) setup: ErasedFixtureFn,
    pub(crate) run: ErasedFixtureFn,
    pub(crate) teardown: ErasedFixtureFn,
}

impl FixtureCase {
    pub fn new<C, D>(
        data: D,
        setup: fn(&mut C, &D),
        run: fn(&mut C, &D),
        teardown: fn(&mut C, &D),
    ) -> Self
    where
        C: Default + 'static,
        D: Send + Sync + 'static,
    {
        fn erase<C, D>(func: fn(&mut C, &D)) -> ErasedFixtureFn
        where
            C: 'static,
            D: Send + Sync + 'static,
        {
            Box::new(move |context: &mut dyn Any, data: &(dyn Any + Send + Sync)| {
                let context = context
                    .downcast_mut::<C>()
                    .expect("fixture context type mismatch at dispatch");
                let data = data
                    .downcast_ref::<D>()
                    .expect("fixture data type mismatch at dispatch");
                func(context, data)
            })
        }

        FixtureCase {
            data: Arc::new(data),
            new_context: Box::new(|| Box::new(C::default())),
            setup: erase(setup),
            run: erase(run),
            teardown: erase(teardown),
        }
    }
}

/// The registration surface the harness consumes from the execution engine.
///
/// Registration happens at suite-initialization time, before any test
/// executes; every method mutates the engine's test registry and returns
/// nothing to the caller.
pub trait TestEngine {
    fn add_test(&mut self, path: &TestPath, func: TestFn);
    fn add_data_test(&mut self, path: &TestPath, case: DataCase);
    fn add_fixture_test(&mut self, path: &TestPath, case: FixtureCase);
}

enum Registration {
    Plain(TestFn),
    Data(DataCase),
    Fixture(FixtureCase),
}

/// Outcome of one dispatched test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Path the case was registered under
    pub path: String,
    /// Whether the case passed
    pub passed: bool,
    /// Panic message for a failing case
    pub message: Option<String>,
}

/// Aggregate result of a sequential run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<CaseOutcome>,
}

impl RunSummary {
    pub fn ok(&self) -> bool {
        self.failed == 0
    }

    /// Exit code for a consuming test binary.
    pub fn exit_code(&self) -> i32 {
        if self.ok() {
            0
        } else {
            1
        }
    }
}

/// Minimal sequential execution engine.
///
/// Dispatches registered cases in registration order on the calling thread,
/// converting panics into per-case failures so the remaining cases still
/// run. Duplicate paths are rejected at registration time.
#[derive(Default)]
pub struct HarnessRegistry {
    cases: Vec<(TestPath, Registration)>,
    seen: HashSet<String>,
}

impl HarnessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths registered so far, in registration order.
    pub fn registered_paths(&self) -> Vec<&str> {
        self.cases.iter().map(|(path, _)| path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    fn record(&mut self, path: &TestPath, registration: Registration) {
        assert!(
            self.seen.insert(path.as_str().to_string()),
            "duplicate test path {path}"
        );
        self.cases.push((path.clone(), registration));
    }

    /// Dispatch every registered case sequentially.
    pub fn run(&self) -> RunSummary {
        let mut outcomes = Vec::with_capacity(self.cases.len());
        for (path, registration) in &self.cases {
            debug!(path = %path, "dispatching test case");
            let result = Self::dispatch(registration);
            outcomes.push(CaseOutcome {
                path: path.as_str().to_string(),
                passed: result.is_ok(),
                message: result.err(),
            });
        }
        let passed = outcomes.iter().filter(|o| o.passed).count();
        RunSummary {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
            outcomes,
        }
    }

    fn dispatch(registration: &Registration) -> std::result::Result<(), String> {
        match registration {
            Registration::Plain(func) => catch(|| func()),
            Registration::Data(case) => catch(|| (case.func)(&*case.data)),
            Registration::Fixture(case) => {
                let mut context = (case.new_context)();
                let mut result = catch(|| (case.setup)(context.as_mut(), &*case.data));
                if result.is_ok() {
                    result = catch(|| (case.run)(context.as_mut(), &*case.data));
                    // teardown runs even when the run phase failed
                    let teardown = catch(|| (case.teardown)(context.as_mut(), &*case.data));
                    result = result.and(teardown);
                }
                drop(context);
                result
            }
        }
    }
}

fn catch<F: FnOnce()>(func: F) -> std::result::Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(func)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "test panicked".to_string()
    }
}

impl TestEngine for HarnessRegistry {
    fn add_test(&mut self, path: &TestPath, func: TestFn) {
        self.record(path, Registration::Plain(func));
    }

    fn add_data_test(&mut self, path: &TestPath, case: DataCase) {
        self.record(path, Registration::Data(case));
    }

    fn add_fixture_test(&mut self, path: &TestPath, case: FixtureCase) {
        self.record(path, Registration::Fixture(case));
    }
}
