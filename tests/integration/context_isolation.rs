use pathable_harness::context::{self, ContextScope};
use pathable_harness::core::HarnessError;
use pathable_harness::resolver::{LayeredResolver, SystemPlatform};
use pathable_harness::runner::{
    ContextScopedSuite, FixtureRegistry, Hierarchy, HierarchySpec, LevelSpec, TestFixture,
    TestMethod, TestStatus,
};
use pathable_harness::test_utils::TestEnvironment;
use pathable_harness::test_utils::environment::{API_LIBRARY, PATHABLE_CASE, TESTCLASSES_LIBRARY};
use std::sync::{Arc, Barrier};

/// Every method tampers with the ambient state before ending its own way.
struct Tampering;

impl TestFixture for Tampering {
    fn methods(&self) -> Vec<TestMethod> {
        vec![
            TestMethod::new("returns_error", |_| {
                context::set_current(None);
                context::set_property("tampered", "error");
                anyhow::bail!("failed on purpose")
            }),
            TestMethod::new("panics", |ctx| {
                context::set_current(Some(Arc::clone(ctx.hierarchy().root())));
                context::set_property("tampered", "panic");
                panic!("panicked on purpose");
            }),
            TestMethod::new("nested_scope", |ctx| {
                // The runner's scope is active, so a second one is refused.
                match ContextScope::enter(Arc::clone(ctx.context_resolver())) {
                    Err(HarnessError::ScopeActive) => Ok(()),
                    other => anyhow::bail!("nested scope was not refused: {:?}", other.err()),
                }
            }),
        ]
    }
}

fn tampering_suite(env: &TestEnvironment) -> ContextScopedSuite {
    let spec = HierarchySpec::new()
        .level(LevelSpec::new("parent").with_library(API_LIBRARY))
        .level(LevelSpec::new("child").with_library(TESTCLASSES_LIBRARY));
    let hierarchy = Hierarchy::build(&spec, &env.catalog().unwrap(), Arc::new(env.platform().unwrap())).unwrap();
    let mut registry = FixtureRegistry::new();
    registry.register(PATHABLE_CASE, Tampering).unwrap();
    ContextScopedSuite::build(&registry, PATHABLE_CASE, hierarchy).unwrap()
}

#[test]
fn test_state_restored_after_every_outcome() {
    let env = TestEnvironment::new().unwrap();
    let suite = tampering_suite(&env);

    let before = LayeredResolver::root("outside", Arc::new(SystemPlatform::new()));
    context::set_current(Some(Arc::clone(&before)));
    context::set_property("tampered", "no");

    let report = suite.run();

    assert_eq!(report.passed(), 1);
    assert!(matches!(
        report.outcome("returns_error").unwrap().status(),
        TestStatus::Failed(_)
    ));
    assert!(matches!(
        report.outcome("panics").unwrap().status(),
        TestStatus::Panicked(message) if message == "panicked on purpose"
    ));
    assert!(report.outcome("nested_scope").unwrap().status().is_passed());

    assert!(Arc::ptr_eq(&context::current().unwrap(), &before));
    assert_eq!(context::property("tampered").as_deref(), Some("no"));
    assert!(!context::in_scope());

    context::set_current(None);
    context::remove_property("tampered");
}

#[test]
fn test_suites_on_separate_threads_do_not_interfere() {
    let env = Arc::new(TestEnvironment::new().unwrap());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["first", "second"]
        .into_iter()
        .map(|label| {
            let env = Arc::clone(&env);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                let marker = LayeredResolver::root(label, Arc::new(SystemPlatform::new()));
                context::set_current(Some(Arc::clone(&marker)));
                let suite = tampering_suite(&env);
                barrier.wait();
                let report = suite.run();
                let restored = context::current().is_some_and(|current| Arc::ptr_eq(&current, &marker));
                (report.passed(), restored)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (1, true));
    }
}

#[test]
fn test_scope_held_outside_the_runner_fails_tests() {
    let env = TestEnvironment::new().unwrap();
    let suite = tampering_suite(&env);
    let held = ContextScope::enter(Arc::clone(suite.hierarchy().root())).unwrap();

    let report = suite.run_selected(&["nested_scope"]).unwrap();
    assert_eq!(report.failed(), 1);

    drop(held);
    assert!(suite.run_selected(&["nested_scope"]).unwrap().is_success());
}
