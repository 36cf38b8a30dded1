//! A ready-made test layout mirroring a logging library's test setup.
//!
//! ```text
//! <temp>/
//! ├── lib/
//! │   ├── commons-logging-1.1.jar           Log, LogFactory, impl/Log4J12Logger
//! │   ├── commons-logging-adapters-1.1.jar  impl/Log4J12Logger
//! │   └── junit-3.8.1.jar                   junit/framework/{Test,TestCase}
//! └── test-classes/                         PathableTestSuite, pathable/PathableTestCase
//! ```
//!
//! Every file's content is the name of the root that holds it, so a test can
//! tell which copy a stream came from.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::{ArchiveFixture, DirectoryFixture};
use crate::catalog::LibraryCatalog;
use crate::resolver::SystemPlatform;
use crate::root::RootLocation;

pub const LOG: &str = "org.apache.commons.logging.Log";
pub const LOG_FACTORY: &str = "org.apache.commons.logging.LogFactory";
pub const LOG4J_LOGGER: &str = "org.apache.commons.logging.impl.Log4J12Logger";
pub const LOG4J_LOGGER_ENTRY: &str = "org/apache/commons/logging/impl/Log4J12Logger.class";
pub const PATHABLE_SUITE: &str = "org.apache.commons.logging.PathableTestSuite";
pub const PATHABLE_CASE: &str = "org.apache.commons.logging.pathable.PathableTestCase";
pub const JUNIT_TEST: &str = "junit.framework.Test";

pub const API_LIBRARY: &str = "commons-logging";
pub const ADAPTERS_LIBRARY: &str = "commons-logging-adapters";
pub const TESTCLASSES_LIBRARY: &str = "testclasses";

pub const API_JAR: &str = "commons-logging-1.1.jar";
pub const ADAPTERS_JAR: &str = "commons-logging-adapters-1.1.jar";
pub const JUNIT_JAR: &str = "junit-3.8.1.jar";

/// Test environment holding the layout above in a temporary directory.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub lib_dir: PathBuf,
    pub classes_dir: PathBuf,
}

impl TestEnvironment {
    /// Create the layout.
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let lib_dir = temp_dir.path().join("lib");
        fs::create_dir_all(&lib_dir)?;

        ArchiveFixture::new(API_JAR)
            .with_directory("org/apache/commons/logging/")
            .with_entry("org/apache/commons/logging/Log.class", API_JAR.as_bytes())
            .with_entry("org/apache/commons/logging/LogFactory.class", API_JAR.as_bytes())
            .with_directory("org/apache/commons/logging/impl/")
            .with_entry(LOG4J_LOGGER_ENTRY, API_JAR.as_bytes())
            .write_to(&lib_dir)?;
        ArchiveFixture::new(ADAPTERS_JAR)
            .with_directory("org/apache/commons/logging/impl/")
            .with_entry(LOG4J_LOGGER_ENTRY, ADAPTERS_JAR.as_bytes())
            .write_to(&lib_dir)?;
        ArchiveFixture::new(JUNIT_JAR)
            .with_entry("junit/framework/Test.class", JUNIT_JAR.as_bytes())
            .with_entry("junit/framework/TestCase.class", JUNIT_JAR.as_bytes())
            .write_to(&lib_dir)?;

        let classes_dir = DirectoryFixture::new("test-classes")
            .with_entry("org/apache/commons/logging/PathableTestSuite.class", b"test-classes")
            .with_entry(
                "org/apache/commons/logging/pathable/PathableTestCase.class",
                b"test-classes",
            )
            .write_to(temp_dir.path())?;

        Ok(Self {
            temp_dir,
            lib_dir,
            classes_dir,
        })
    }

    /// Root of the temporary layout.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn junit_jar(&self) -> PathBuf {
        self.lib_dir.join(JUNIT_JAR)
    }

    /// `commons-logging` and `commons-logging-adapters` discovered in `lib/`,
    /// plus `testclasses` for the class directory.
    pub fn catalog(&self) -> Result<LibraryCatalog> {
        let mut catalog = LibraryCatalog::new();
        let search = [self.lib_dir.clone()];
        catalog.register_discovered(API_LIBRARY, &search)?;
        catalog.register_discovered(ADAPTERS_LIBRARY, &search)?;
        catalog.register_paths(TESTCLASSES_LIBRARY, &[&self.classes_dir])?;
        Ok(catalog)
    }

    /// Bootstrap owns `java.`; the system tier has junit.
    pub fn platform(&self) -> Result<SystemPlatform> {
        Ok(SystemPlatform::new()
            .with_bootstrap_prefix("java.")
            .with_system_roots(vec![RootLocation::open(&self.junit_jar())?]))
    }

    /// Write a `pathable.toml` describing this layout with a parent level
    /// (`commons-logging`, junit passthrough) and a child level (adapters and
    /// test classes).
    pub fn write_config(&self) -> Result<PathBuf> {
        let path = self.path().join("pathable.toml");
        fs::write(
            &path,
            format!(
                r#"search_paths = ["lib"]
discover = ["{API_LIBRARY}", "{ADAPTERS_LIBRARY}"]

[libraries]
{TESTCLASSES_LIBRARY} = ["test-classes"]

[platform]
bootstrap_prefixes = ["java."]
system_roots = ["lib/{JUNIT_JAR}"]

[hierarchy]
context_level = "child"

[[hierarchy.levels]]
label = "parent"
libraries = ["{API_LIBRARY}"]
system_prefixes = ["junit."]

[[hierarchy.levels]]
label = "child"
libraries = ["{ADAPTERS_LIBRARY}", "{TESTCLASSES_LIBRARY}"]
"#
            ),
        )?;
        Ok(path)
    }
}
