use pathable_harness::catalog::{self, LibraryCatalog};
use pathable_harness::core::{ErrorKind, HarnessError};
use pathable_harness::resolver::{LayeredResolver, Origin, PlatformResolver, SystemPlatform};
use pathable_harness::test_utils::environment::{
    ADAPTERS_JAR, ADAPTERS_LIBRARY, API_JAR, API_LIBRARY, JUNIT_TEST, LOG, LOG4J_LOGGER,
    LOG4J_LOGGER_ENTRY, PATHABLE_CASE, TESTCLASSES_LIBRARY,
};
use pathable_harness::test_utils::{ArchiveFixture, TestEnvironment};
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

/// Catalog `logging-api -> [A]`, `logging-adapters -> [B]`, `testclasses -> [C]`,
/// with root = [A] and child = [B, C].
#[test]
fn test_three_library_scenario() {
    let temp = TempDir::new().unwrap();
    let a = ArchiveFixture::new("a.jar")
        .with_entry("org/example/Log.class", b"A")
        .with_entry("org/example/impl/Adapter.class", b"A")
        .with_entry("META-INF/services/org.example.Log", b"A")
        .write_to(temp.path())
        .unwrap();
    let b = ArchiveFixture::new("b.jar")
        .with_entry("org/example/impl/Adapter.class", b"B")
        .with_entry("META-INF/services/org.example.Log", b"B")
        .write_to(temp.path())
        .unwrap();
    let c = ArchiveFixture::new("c.jar")
        .with_entry("org/example/SuiteEntry.class", b"C")
        .write_to(temp.path())
        .unwrap();

    let mut catalog = LibraryCatalog::new();
    catalog.register_paths("logging-api", &[a]).unwrap();
    catalog.register_paths("logging-adapters", &[b]).unwrap();
    catalog.register_paths("testclasses", &[c]).unwrap();

    let root = LayeredResolver::root("root", Arc::new(SystemPlatform::new()));
    root.add_logical_lib("logging-api", &catalog).unwrap();
    let child = LayeredResolver::child("child", &root);
    child.add_logical_lib("logging-adapters", &catalog).unwrap();
    child.add_logical_lib("testclasses", &catalog).unwrap();

    assert!(child.find_class("org.example.Log").unwrap().is_defined_by(&root));
    assert!(child.find_class("org.example.impl.Adapter").unwrap().is_defined_by(&root));
    assert!(child.find_class("org.example.SuiteEntry").unwrap().is_defined_by(&child));
    assert!(child.find_class("org.example.Missing").unwrap_err().is_not_found());

    let services = child.find_all_resources("META-INF/services/org.example.Log");
    assert_eq!(services.len(), 2);
    assert!(services[0].to_string().ends_with("/a.jar!/META-INF/services/org.example.Log"));
    assert!(services[1].to_string().ends_with("/b.jar!/META-INF/services/org.example.Log"));

    let mut first = String::new();
    child
        .open_resource_stream("META-INF/services/org.example.Log")
        .unwrap()
        .unwrap()
        .read_to_string(&mut first)
        .unwrap();
    assert_eq!(first, "A");
}

#[test]
fn test_discovered_libraries_pick_exact_jar() {
    let env = TestEnvironment::new().unwrap();
    let catalog = env.catalog().unwrap();

    let api = catalog.resolve(API_LIBRARY).unwrap();
    assert!(api[0].path().ends_with(API_JAR));
    let adapters = catalog.resolve(ADAPTERS_LIBRARY).unwrap();
    assert!(adapters[0].path().ends_with(ADAPTERS_JAR));
    assert!(catalog.resolve("log4j").unwrap_err().kind() == ErrorKind::UnknownLibrary);
}

#[test]
fn test_standard_two_level_hierarchy() {
    let env = TestEnvironment::new().unwrap();
    let catalog = env.catalog().unwrap();
    let platform: Arc<dyn PlatformResolver> = Arc::new(env.platform().unwrap());

    let parent = LayeredResolver::root("parent", platform);
    parent.allow_system_prefix("junit.").unwrap();
    parent.add_logical_lib(API_LIBRARY, &catalog).unwrap();
    let child = LayeredResolver::child("child", &parent);
    child.add_logical_lib(ADAPTERS_LIBRARY, &catalog).unwrap();
    child.add_logical_lib(TESTCLASSES_LIBRARY, &catalog).unwrap();

    assert!(child.find_class(PATHABLE_CASE).unwrap().is_defined_by(&child));
    assert!(child.find_class(LOG).unwrap().is_defined_by(&parent));
    let logger = child.find_class(LOG4J_LOGGER).unwrap();
    assert!(logger.is_defined_by(&parent));
    assert!(logger.locator().unwrap().to_string().contains(API_JAR));

    assert_eq!(child.find_class(JUNIT_TEST).unwrap().origin(), Origin::System);
    assert_eq!(child.find_class("java.lang.String").unwrap().origin(), Origin::Bootstrap);

    let all = child.find_all_resources(LOG4J_LOGGER_ENTRY);
    assert_eq!(all.len(), 2);
    assert!(all[0].to_string().contains(API_JAR));
    assert!(all[1].to_string().contains(ADAPTERS_JAR));

    assert!(child.find_resource("nosuchfile").is_none());
    assert!(child.find_all_resources("nosuchfile").is_empty());
}

#[test]
fn test_lookups_from_many_threads() {
    let env = TestEnvironment::new().unwrap();
    let catalog = env.catalog().unwrap();
    let parent = LayeredResolver::root("parent", Arc::new(env.platform().unwrap()));
    parent.add_logical_lib(API_LIBRARY, &catalog).unwrap();
    let child = LayeredResolver::child("child", &parent);
    child.add_logical_lib(ADAPTERS_LIBRARY, &catalog).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let child = Arc::clone(&child);
            std::thread::spawn(move || {
                let handle = child.find_class(LOG4J_LOGGER).unwrap();
                (handle.defined_by().to_string(), child.find_all_resources(LOG4J_LOGGER_ENTRY).len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), ("parent".to_string(), 2));
    }
    assert!(child.is_sealed());
    assert!(parent.is_sealed());
}

#[test]
fn test_global_catalog_installs_once() {
    let env = TestEnvironment::new().unwrap();
    let installed = catalog::install_global(env.catalog().unwrap()).unwrap();
    assert!(installed.contains(API_LIBRARY));
    assert!(catalog::global().is_some_and(|global| global.contains(TESTCLASSES_LIBRARY)));

    let err = catalog::install_global(LibraryCatalog::new()).unwrap_err();
    assert!(matches!(err, HarnessError::CatalogAlreadyInstalled));
    assert_eq!(catalog::global().unwrap().len(), installed.len());
}
