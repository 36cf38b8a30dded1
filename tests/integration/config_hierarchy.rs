use pathable_harness::config::HarnessConfig;
use pathable_harness::context;
use pathable_harness::core::ErrorKind;
use pathable_harness::resolver::Origin;
use pathable_harness::runner::{ContextScopedSuite, FixtureRegistry, TestFixture, TestMethod};
use pathable_harness::test_utils::TestEnvironment;
use pathable_harness::test_utils::environment::{
    ADAPTERS_JAR, JUNIT_TEST, LOG4J_LOGGER, LOG4J_LOGGER_ENTRY, PATHABLE_SUITE,
};

struct ContextProbe;

impl TestFixture for ContextProbe {
    fn methods(&self) -> Vec<TestMethod> {
        vec![TestMethod::new("ambient_is_child", |ctx| {
            let current = context::current().ok_or_else(|| anyhow::anyhow!("no ambient resolver"))?;
            anyhow::ensure!(current.label() == "child");
            anyhow::ensure!(current.find_class(JUNIT_TEST)?.origin() == Origin::System);
            anyhow::ensure!(ctx.entry().defined_by() == "child");
            Ok(())
        })]
    }
}

#[test]
fn test_config_file_builds_full_hierarchy() {
    let env = TestEnvironment::new().unwrap();
    let config = HarnessConfig::load(&env.write_config().unwrap()).unwrap();
    let (catalog, hierarchy) = config.build_hierarchy().unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(
        hierarchy.levels().iter().map(|l| l.label()).collect::<Vec<_>>(),
        vec!["parent", "child"]
    );

    let child = hierarchy.context_resolver();
    assert!(child.find_class(LOG4J_LOGGER).unwrap().is_defined_by(hierarchy.root()));
    let copies = child.find_all_resources(LOG4J_LOGGER_ENTRY);
    assert!(copies[1].to_string().contains(ADAPTERS_JAR));

    let mut registry = FixtureRegistry::new();
    registry.register(PATHABLE_SUITE, ContextProbe).unwrap();
    let report = ContextScopedSuite::build(&registry, PATHABLE_SUITE, hierarchy)
        .unwrap()
        .run();
    assert!(report.is_success(), "{report}");
}

#[test]
fn test_config_with_unknown_level_library() {
    let env = TestEnvironment::new().unwrap();
    let path = env.path().join("broken.toml");
    std::fs::write(
        &path,
        "[libraries]\ntests = [\"test-classes\"]\n\n[[hierarchy.levels]]\nlabel = \"only\"\nlibraries = [\"log4j\"]\n",
    )
    .unwrap();

    let config = HarnessConfig::load(&path).unwrap();
    let err = config.build_hierarchy().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownLibrary);
}

#[test]
fn test_config_with_undiscoverable_library() {
    let env = TestEnvironment::new().unwrap();
    let path = env.path().join("discover.toml");
    std::fs::write(&path, "search_paths = [\"lib\"]\ndiscover = [\"log4j\"]\n").unwrap();

    let err = HarnessConfig::load(&path).unwrap().build_catalog().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownLibrary);
}
