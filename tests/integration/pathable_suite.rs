//! Suites whose test methods inspect the hierarchy they run under.

use anyhow::{Context, Result, ensure};
use pathable_harness::context;
use pathable_harness::resolver::{Origin, PlatformResolver};
use pathable_harness::runner::{
    ContextScopedSuite, FixtureRegistry, Hierarchy, HierarchySpec, LevelSpec, TestContext,
    TestFixture, TestMethod, TestStatus,
};
use pathable_harness::test_utils::TestEnvironment;
use pathable_harness::test_utils::environment::{
    ADAPTERS_JAR, ADAPTERS_LIBRARY, API_JAR, API_LIBRARY, JUNIT_TEST, LOG, LOG4J_LOGGER,
    LOG4J_LOGGER_ENTRY, LOG_FACTORY, PATHABLE_CASE, PATHABLE_SUITE, TESTCLASSES_LIBRARY,
};
use std::io::Read;
use std::sync::Arc;

const MARKER: &str = "org.apache.commons.logging.test.marker";

/// Expectations that differ between parent-first and child-first children.
#[derive(Clone, Copy)]
struct LoggingCase {
    /// Level expected to define the adapter class
    adapter_level: &'static str,
    /// Jar expected first in a multi-resource listing of the adapter
    first_copy: &'static str,
}

fn read_all(ctx: &TestContext<'_>, name: &str) -> Result<Option<String>> {
    let Some(mut stream) = ctx.context_resolver().open_resource_stream(name)? else {
        return Ok(None);
    };
    let mut content = String::new();
    stream.read_to_string(&mut content)?;
    Ok(Some(content))
}

impl TestFixture for LoggingCase {
    fn methods(&self) -> Vec<TestMethod> {
        let case = *self;
        vec![
            TestMethod::new("test_paths", move |ctx| {
                let current = context::current().context("no ambient resolver")?;
                ensure!(current.id() == ctx.context_resolver().id(), "context level not installed");

                let parent = ctx.level("parent")?;
                let child = ctx.level("child")?;
                ensure!(ctx.entry().is_defined_by(child), "entry not loaded by child");
                ensure!(Arc::ptr_eq(ctx.entry_resolver(), child), "entry level is not child");
                let context_parent = ctx.context_resolver().parent().context("context level has no parent")?;
                ensure!(Arc::ptr_eq(context_parent, child), "context level's parent is not the entry level");
                let entry_parent = child.parent().context("child has no parent")?;
                ensure!(Arc::ptr_eq(entry_parent, parent), "entry level's parent is not the root");

                let suite_class = current.find_class(PATHABLE_SUITE)?;
                ensure!(suite_class.is_defined_by(child), "suite class defined by {}", suite_class.defined_by());

                for name in [LOG, LOG_FACTORY] {
                    let handle = current.find_class(name)?;
                    ensure!(handle.is_defined_by(parent), "{name} defined by {}", handle.defined_by());
                }

                let adapter = current.find_class(LOG4J_LOGGER)?;
                ensure!(
                    adapter.is_defined_by(ctx.level(case.adapter_level)?),
                    "adapter defined by {}",
                    adapter.defined_by()
                );

                ensure!(current.find_class(JUNIT_TEST)?.origin() == Origin::System);
                ensure!(current.find_class("java.lang.String")?.origin() == Origin::Bootstrap);
                ensure!(current.find_class("org.apache.commons.logging.NoSuchClass").is_err());
                Ok(())
            }),
            TestMethod::new("test_resource", |ctx| {
                let resolver = ctx.context_resolver();
                ensure!(resolver.find_resource("nosuchfile").is_none());
                let found = resolver
                    .find_resource("org/apache/commons/logging/Log.class")
                    .context("Log.class not visible")?;
                ensure!(found.to_string().contains(API_JAR), "found {found}");
                Ok(())
            }),
            TestMethod::new("test_resources", move |ctx| {
                let resolver = ctx.context_resolver();
                ensure!(resolver.find_all_resources("nosuchfile").is_empty());

                let copies = resolver.find_all_resources(LOG4J_LOGGER_ENTRY);
                ensure!(copies.len() == 2, "expected two copies, got {}", copies.len());
                ensure!(copies[0].to_string().contains(case.first_copy), "first copy {}", copies[0]);

                let single = resolver.find_all_resources("org/apache/commons/logging/Log.class");
                ensure!(single.len() == 1);
                Ok(())
            }),
            TestMethod::new("test_resource_as_stream", |ctx| {
                ensure!(read_all(ctx, "nosuchfile")?.is_none());
                let content = read_all(ctx, "org/apache/commons/logging/Log.class")?;
                ensure!(content.as_deref() == Some(API_JAR), "content {content:?}");
                Ok(())
            }),
            TestMethod::new("test_reset_context1", |ctx| check_and_disturb(ctx)),
            TestMethod::new("test_reset_context2", |ctx| check_and_disturb(ctx)),
        ]
    }
}

/// Both reset tests run this: whichever runs second sees what the first left
/// behind unless the runner restored the context in between.
fn check_and_disturb(ctx: &TestContext<'_>) -> Result<()> {
    let current = context::current().context("no ambient resolver")?;
    ensure!(current.id() == ctx.context_resolver().id(), "context was not reset");
    ensure!(context::property(MARKER).is_none(), "property leaked from a previous test");

    context::set_current(Some(Arc::clone(ctx.hierarchy().root())));
    context::set_property(MARKER, ctx.test_name());
    Ok(())
}

fn hierarchy(env: &TestEnvironment, child_first: bool) -> Hierarchy {
    let child = LevelSpec::new("child")
        .with_library(ADAPTERS_LIBRARY)
        .with_library(TESTCLASSES_LIBRARY);
    let child = if child_first { child.child_first() } else { child };
    let spec = HierarchySpec::new()
        .level(
            LevelSpec::new("parent")
                .with_library(API_LIBRARY)
                .with_system_prefix("junit."),
        )
        .level(child)
        .level(LevelSpec::new("context"))
        .with_entry_level("child")
        .with_context_level("context");

    let platform: Arc<dyn PlatformResolver> = Arc::new(env.platform().unwrap());
    Hierarchy::build(&spec, &env.catalog().unwrap(), platform).unwrap()
}

fn suite(env: &TestEnvironment, child_first: bool) -> ContextScopedSuite {
    let case = if child_first {
        LoggingCase {
            adapter_level: "child",
            first_copy: ADAPTERS_JAR,
        }
    } else {
        LoggingCase {
            adapter_level: "parent",
            first_copy: API_JAR,
        }
    };
    let mut registry = FixtureRegistry::new();
    registry.register(PATHABLE_CASE, case).unwrap();
    ContextScopedSuite::build(&registry, PATHABLE_CASE, hierarchy(env, child_first)).unwrap()
}

#[test]
fn test_parent_first_suite() {
    let env = TestEnvironment::new().unwrap();
    let suite = suite(&env, false);
    let hierarchy = suite.hierarchy();
    assert!(suite.entry().is_defined_by(hierarchy.entry_resolver()));
    assert_eq!(hierarchy.entry_resolver().label(), "child");
    assert_eq!(hierarchy.context_resolver().label(), "context");
    assert!(Arc::ptr_eq(
        hierarchy.context_resolver().parent().unwrap(),
        hierarchy.entry_resolver()
    ));

    let report = suite.run();
    assert_eq!(report.len(), 6);
    assert!(report.is_success(), "{report}");
}

#[test]
fn test_child_first_suite() {
    let env = TestEnvironment::new().unwrap();
    let report = suite(&env, true).run();
    assert!(report.is_success(), "{report}");
}

#[test]
fn test_reset_tests_in_either_order() {
    let env = TestEnvironment::new().unwrap();
    let suite = suite(&env, false);

    for order in [
        ["test_reset_context1", "test_reset_context2"],
        ["test_reset_context2", "test_reset_context1"],
    ] {
        let report = suite.run_selected(&order).unwrap();
        assert!(report.is_success(), "{report}");
    }
    assert!(context::current().is_none());
    assert!(context::property(MARKER).is_none());
}

#[test]
fn test_wrong_expectations_are_reported_unchanged() {
    let env = TestEnvironment::new().unwrap();
    let mut registry = FixtureRegistry::new();
    // Parent-first expectations against a child-first hierarchy.
    registry
        .register(
            PATHABLE_CASE,
            LoggingCase {
                adapter_level: "parent",
                first_copy: API_JAR,
            },
        )
        .unwrap();
    let suite = ContextScopedSuite::build(&registry, PATHABLE_CASE, hierarchy(&env, true)).unwrap();

    let report = suite.run_selected(&["test_paths", "test_resources"]).unwrap();
    assert_eq!(report.failed(), 2);
    match report.outcome("test_paths").unwrap().status() {
        TestStatus::Failed(error) => assert_eq!(error.to_string(), "adapter defined by child"),
        other => panic!("unexpected status {other:?}"),
    }
}
