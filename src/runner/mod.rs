//! Context-scoped test execution over a resolver hierarchy.
//!
//! A [`ContextScopedSuite`] is assembled from three things:
//!
//! - a [`Hierarchy`] built from a [`HierarchySpec`] and a catalog
//! - an entry type name, loaded through the hierarchy's entry level
//! - a [`TestFixture`] registered under that name in a [`FixtureRegistry`]
//!
//! Running the suite wraps every test method in a
//! [`ContextScope`](crate::context::ContextScope) for the hierarchy's context
//! level. The ambient resolver and properties seen after each method equal the
//! ones seen before it, whatever the method did.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathable_harness::catalog::LibraryCatalog;
//! use pathable_harness::context;
//! use pathable_harness::resolver::SystemPlatform;
//! use pathable_harness::runner::{
//!     ContextScopedSuite, FixtureRegistry, Hierarchy, HierarchySpec, LevelSpec, TestFixture,
//!     TestMethod,
//! };
//! use std::sync::Arc;
//!
//! struct Smoke;
//!
//! impl TestFixture for Smoke {
//!     fn methods(&self) -> Vec<TestMethod> {
//!         vec![TestMethod::new("context_installed", |ctx| {
//!             anyhow::ensure!(context::current().is_some_and(|r| r.id() == ctx.context_resolver().id()));
//!             Ok(())
//!         })]
//!     }
//! }
//!
//! # fn example(catalog: &LibraryCatalog) -> anyhow::Result<()> {
//! let spec = HierarchySpec::new()
//!     .level(LevelSpec::new("parent").with_library("commons-logging"))
//!     .level(LevelSpec::new("child").with_library("testclasses"));
//! let hierarchy = Hierarchy::build(&spec, catalog, Arc::new(SystemPlatform::new()))?;
//!
//! let mut registry = FixtureRegistry::new();
//! registry.register("org.example.Smoke", Smoke)?;
//!
//! let suite = ContextScopedSuite::build(&registry, "org.example.Smoke", hierarchy)?;
//! let report = suite.run();
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

mod hierarchy;
mod report;

pub use hierarchy::{Hierarchy, HierarchySpec, LevelSpec};
pub use report::{TestOutcome, TestReport, TestStatus};

use crate::context::ContextScope;
use crate::core::{HarnessError, HarnessResult};
use crate::resolver::{ClassHandle, LayeredResolver};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Signature of a test method body.
pub type TestBody = Box<dyn Fn(&TestContext<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A named test method.
pub struct TestMethod {
    name: String,
    body: TestBody,
}

impl TestMethod {
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&TestContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestMethod").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A loadable entry type that exposes test methods.
pub trait TestFixture: Send + Sync {
    /// Test methods in discovery order.
    fn methods(&self) -> Vec<TestMethod>;
}

/// Fixtures by the symbolic name of their entry type.
#[derive(Default)]
pub struct FixtureRegistry {
    fixtures: BTreeMap<String, Arc<dyn TestFixture>>,
}

impl FixtureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fixture` under `name`.
    ///
    /// # Errors
    ///
    /// [`HarnessError::DuplicateFixture`] if `name` is taken.
    pub fn register(&mut self, name: impl Into<String>, fixture: impl TestFixture + 'static) -> HarnessResult<()> {
        let name = name.into();
        if self.fixtures.contains_key(&name) {
            return Err(HarnessError::DuplicateFixture { name });
        }
        debug!("Registered test fixture '{}'", name);
        self.fixtures.insert(name, Arc::new(fixture));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TestFixture>> {
        self.fixtures.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fixtures.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for FixtureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.fixtures.keys()).finish()
    }
}

/// What a running test method can see.
#[derive(Debug, Clone, Copy)]
pub struct TestContext<'a> {
    test_name: &'a str,
    entry: &'a ClassHandle,
    hierarchy: &'a Hierarchy,
}

impl<'a> TestContext<'a> {
    #[must_use]
    pub const fn test_name(&self) -> &'a str {
        self.test_name
    }

    /// The loaded entry type.
    #[must_use]
    pub const fn entry(&self) -> &'a ClassHandle {
        self.entry
    }

    #[must_use]
    pub const fn hierarchy(&self) -> &'a Hierarchy {
        self.hierarchy
    }

    /// Level that loaded the entry type.
    #[must_use]
    pub fn entry_resolver(&self) -> &'a Arc<LayeredResolver> {
        self.hierarchy.entry_resolver()
    }

    /// Level installed as ambient context for this test.
    #[must_use]
    pub fn context_resolver(&self) -> &'a Arc<LayeredResolver> {
        self.hierarchy.context_resolver()
    }

    /// Level by label.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownLevel`] if no level has that label.
    pub fn level(&self, label: &str) -> HarnessResult<&'a Arc<LayeredResolver>> {
        self.hierarchy.level(label)
    }
}

/// A fixture bound to a hierarchy, ready to run.
#[derive(Debug)]
pub struct ContextScopedSuite {
    entry: ClassHandle,
    hierarchy: Hierarchy,
    methods: Vec<TestMethod>,
}

impl ContextScopedSuite {
    /// Load `entry_name` through the entry level and bind its fixture.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::ClassNotFound`] if the entry level cannot load
    ///   `entry_name`
    /// - [`HarnessError::UnknownEntry`] if no fixture is registered under it
    pub fn build(registry: &FixtureRegistry, entry_name: &str, hierarchy: Hierarchy) -> HarnessResult<Self> {
        let entry_resolver = hierarchy.entry_resolver();
        let entry = entry_resolver.find_class(entry_name)?;
        if !entry.is_defined_by(entry_resolver) {
            warn!(
                "Entry type '{}' was loaded by {} rather than entry level '{}'",
                entry_name,
                entry.defined_by(),
                entry_resolver.label()
            );
        }

        let fixture = registry.get(entry_name).ok_or_else(|| HarnessError::UnknownEntry {
            name: entry_name.to_string(),
        })?;
        let methods = fixture.methods();
        debug!("Discovered {} test method(s) on '{}'", methods.len(), entry_name);

        Ok(Self {
            entry,
            hierarchy,
            methods,
        })
    }

    /// The loaded entry type; its origin shows which level defined it.
    #[must_use]
    pub const fn entry(&self) -> &ClassHandle {
        &self.entry
    }

    #[must_use]
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Test method names in discovery order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(TestMethod::name)
    }

    /// Run every method in discovery order.
    #[must_use]
    pub fn run(&self) -> TestReport {
        let order: Vec<&TestMethod> = self.methods.iter().collect();
        self.run_methods(&order)
    }

    /// Run the named methods in the given order.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownTest`] if any name is not a method of this
    /// suite; nothing runs in that case.
    pub fn run_selected(&self, names: &[&str]) -> HarnessResult<TestReport> {
        let order = names
            .iter()
            .map(|name| {
                self.methods
                    .iter()
                    .find(|method| method.name == *name)
                    .ok_or_else(|| HarnessError::UnknownTest {
                        name: (*name).to_string(),
                    })
            })
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(self.run_methods(&order))
    }

    fn run_methods(&self, methods: &[&TestMethod]) -> TestReport {
        info!(
            "Running {} test(s) from '{}' with context '{}'",
            methods.len(),
            self.entry.name(),
            self.hierarchy.context_resolver().label()
        );
        let outcomes = methods.iter().map(|method| self.run_one(method)).collect();
        let report = TestReport::new(self.entry.name(), outcomes);
        info!("{}", report.summary());
        report
    }

    fn run_one(&self, method: &TestMethod) -> TestOutcome {
        let context = TestContext {
            test_name: &method.name,
            entry: &self.entry,
            hierarchy: &self.hierarchy,
        };
        let start = Instant::now();

        let status = match ContextScope::enter(Arc::clone(self.hierarchy.context_resolver())) {
            Ok(scope) => {
                let result = panic::catch_unwind(AssertUnwindSafe(|| (method.body)(&context)));
                drop(scope);
                match result {
                    Ok(Ok(())) => TestStatus::Passed,
                    Ok(Err(error)) => TestStatus::Failed(error),
                    Err(payload) => TestStatus::Panicked(panic_message(payload.as_ref())),
                }
            }
            Err(error) => TestStatus::Failed(error.into()),
        };

        match &status {
            TestStatus::Passed => debug!("Test '{}' passed", method.name),
            TestStatus::Failed(error) => warn!("Test '{}' failed: {:#}", method.name, error),
            TestStatus::Panicked(message) => warn!("Test '{}' panicked: {}", method.name, message),
        }
        TestOutcome::new(&method.name, status, start.elapsed())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
