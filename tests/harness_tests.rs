//! End-to-end harness tests: registration through dispatch, fixture
//! lifecycle, font fixture loading and blob comparison, exercised the way
//! a suite's test binary uses the crate.

use std::io::Write;
use std::panic;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use shaper_test_harness::{
    add_data_test_flavor, add_fixture, add_test, assert_blobs_equal, diff_blobs, open_font_file,
    open_font_file_with_index, Blob, FaceBuilder, HarnessRegistry, Tag, TestPath,
};

fn noop() {}

#[test]
fn plain_registration_uses_normalized_path() {
    let mut registry = HarnessRegistry::new();
    add_test(&mut registry, "test_shape_basic", noop);
    assert_eq!(registry.registered_paths(), vec!["/shape_basic"]);
    assert!(registry.run().ok());
}

#[test]
fn flavored_registration_appends_subpath() {
    fn body(flavor: &String) {
        assert!(!flavor.is_empty());
    }
    let base = TestPath::from_normalized("/shape_basic");
    let mut registry = HarnessRegistry::new();
    add_data_test_flavor(&mut registry, &base, "ot", "ot".to_string(), body);
    assert_eq!(registry.registered_paths(), vec!["/shape_basic/ot"]);
    assert!(registry.run().ok());
}

/// Shared log the fixture phases append to, so ordering is observable
/// after the run.
#[derive(Clone)]
struct PhaseLog(Arc<Mutex<Vec<&'static str>>>);

impl PhaseLog {
    fn new() -> Self {
        PhaseLog(Arc::new(Mutex::new(Vec::new())))
    }

    fn push(&self, phase: &'static str) {
        self.0.lock().unwrap().push(phase);
    }

    fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct ShapeContext {
    prepared: bool,
}

#[test]
fn fixture_phases_share_one_context_in_order() {
    fn setup(context: &mut ShapeContext, log: &PhaseLog) {
        assert!(!context.prepared);
        context.prepared = true;
        log.push("setup");
    }
    fn run(context: &mut ShapeContext, log: &PhaseLog) {
        assert!(context.prepared);
        log.push("run");
    }
    fn teardown(context: &mut ShapeContext, log: &PhaseLog) {
        assert!(context.prepared);
        log.push("teardown");
    }

    let log = PhaseLog::new();
    let mut registry = HarnessRegistry::new();
    add_fixture(
        &mut registry,
        "test_fixture_lifecycle",
        log.clone(),
        setup,
        run,
        teardown,
    );
    assert_eq!(registry.registered_paths(), vec!["/fixture_lifecycle"]);
    let summary = registry.run();
    assert!(summary.ok());
    assert_eq!(log.entries(), vec!["setup", "run", "teardown"]);
}

#[test]
fn fixture_teardown_runs_when_run_phase_fails() {
    fn setup(_: &mut ShapeContext, log: &PhaseLog) {
        log.push("setup");
    }
    fn run(_: &mut ShapeContext, _: &PhaseLog) {
        panic!("shaped output did not match");
    }
    fn teardown(_: &mut ShapeContext, log: &PhaseLog) {
        log.push("teardown");
    }

    let log = PhaseLog::new();
    let mut registry = HarnessRegistry::new();
    add_fixture(
        &mut registry,
        "test_fixture_failure",
        log.clone(),
        setup,
        run,
        teardown,
    );
    let summary = registry.run();
    assert_eq!(summary.failed, 1);
    assert_eq!(
        summary.outcomes[0].message.as_deref(),
        Some("shaped output did not match")
    );
    assert_eq!(log.entries(), vec!["setup", "teardown"]);
}

#[test]
fn fixture_context_is_released_once_when_run_phase_fails() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static RELEASED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct TrackedContext;

    impl Drop for TrackedContext {
        fn drop(&mut self) {
            RELEASED.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn setup(_: &mut TrackedContext, _: &()) {}
    fn run(_: &mut TrackedContext, _: &()) {
        panic!("shaping mismatch");
    }
    fn teardown(_: &mut TrackedContext, _: &()) {}

    let mut registry = HarnessRegistry::new();
    add_fixture(
        &mut registry,
        "test_tracked_context",
        (),
        setup,
        run,
        teardown,
    );
    let summary = registry.run();
    assert_eq!(summary.failed, 1);
    assert_eq!(RELEASED.load(Ordering::SeqCst), 1);
}

#[test]
fn fixture_setup_failure_skips_run_and_teardown() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static RELEASED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct HalfBuiltContext;

    impl Drop for HalfBuiltContext {
        fn drop(&mut self) {
            RELEASED.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn setup(_: &mut HalfBuiltContext, _: &PhaseLog) {
        panic!("fixture font unavailable");
    }
    fn run(_: &mut HalfBuiltContext, log: &PhaseLog) {
        log.push("run");
    }
    fn teardown(_: &mut HalfBuiltContext, log: &PhaseLog) {
        log.push("teardown");
    }

    let log = PhaseLog::new();
    let mut registry = HarnessRegistry::new();
    add_fixture(
        &mut registry,
        "test_setup_failure",
        log.clone(),
        setup,
        run,
        teardown,
    );
    let summary = registry.run();
    assert_eq!(summary.failed, 1);
    assert_eq!(
        summary.outcomes[0].message.as_deref(),
        Some("fixture font unavailable")
    );
    // a half-initialized context must not reach the later phases, but it
    // is still released
    assert!(log.entries().is_empty());
    assert_eq!(RELEASED.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_case_does_not_stop_later_cases() {
    fn failing() {
        panic!("boom");
    }
    let mut registry = HarnessRegistry::new();
    add_test(&mut registry, "test_first_fails", failing);
    add_test(&mut registry, "test_second_passes", noop);
    let summary = registry.run();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 1);
    assert!(summary.outcomes[1].passed);
}

#[test]
fn open_font_file_reads_absolute_path() {
    let dir = shaper_test_harness::utils::create_test_output_dir().unwrap();
    let font_path = dir.path().join("tiny.ttf");
    let mut file = std::fs::File::create(&font_path).unwrap();
    file.write_all(b"\x00\x01\x00\x00fake").unwrap();
    drop(file);

    let face = open_font_file(&font_path);
    assert_eq!(face.index(), 0);
    assert_eq!(face.data(), b"\x00\x01\x00\x00fake");

    let second = open_font_file_with_index(&font_path, 1);
    assert_eq!(second.index(), 1);
}

#[test]
fn open_font_file_aborts_with_resolved_path() {
    let result = panic::catch_unwind(|| open_font_file("fonts/definitely-missing.ttf"));
    let payload = result.unwrap_err();
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap();
    assert!(
        message.contains("fonts/definitely-missing.ttf"),
        "message {message:?} does not name the resolved path"
    );
}

#[test]
fn comparator_diagnoses_single_byte_divergence() {
    let expected = Blob::from_bytes(&hex::decode("010203").unwrap());
    let actual = Blob::from_bytes(&hex::decode("01ff03").unwrap());
    let diffs = diff_blobs(&expected, &actual);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].offset, 1);
    assert_eq!(diffs[0].expected, 0x02);
    assert_eq!(diffs[0].actual, 0xFF);

    let result = panic::catch_unwind(|| assert_blobs_equal(&expected, &actual));
    assert!(result.is_err());
}

#[test]
fn synthesized_face_feeds_comparator() {
    // fixture fonts are built from embedded byte arrays via table injection
    let glyf = Blob::from_bytes(&[0x00, 0x10, 0x00, 0x20]);
    let mut builder = FaceBuilder::new();
    builder.add_table(Tag::new(b"glyf"), &glyf);
    let face = builder.build();

    let produced = Blob::from_bytes(face.table(Tag::new(b"glyf")).unwrap());
    assert_blobs_equal(&glyf, &produced);
}

#[test]
fn registry_mixes_registration_shapes() {
    fn data_body(value: &u8) {
        assert_eq!(*value, 7);
    }
    fn phase(_: &mut ShapeContext, _: &()) {}

    let mut registry = HarnessRegistry::new();
    add_test(&mut registry, "test_plain", noop);
    add_data_test_flavor(
        &mut registry,
        &TestPath::from_normalized("/plain"),
        "variant",
        7u8,
        data_body,
    );
    add_fixture(&mut registry, "test_with_fixture", (), phase, phase, phase);
    assert_eq!(
        registry.registered_paths(),
        vec!["/plain", "/plain/variant", "/with_fixture"]
    );
    assert!(registry.run().ok());
    assert_eq!(registry.len(), 3);
    assert!(!registry.is_empty());
}
