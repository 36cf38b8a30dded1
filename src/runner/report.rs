//! Outcomes of a suite run.

use std::fmt;
use std::time::Duration;

/// How a test method ended. Failures are kept exactly as the method produced
/// them.
#[derive(Debug)]
pub enum TestStatus {
    Passed,
    /// The method returned an error
    Failed(anyhow::Error),
    /// The method panicked; the panic message
    Panicked(String),
}

impl TestStatus {
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one test method.
#[derive(Debug)]
pub struct TestOutcome {
    name: String,
    status: TestStatus,
    duration: Duration,
}

impl TestOutcome {
    pub(crate) fn new(name: &str, status: TestStatus, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            status,
            duration,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn status(&self) -> &TestStatus {
        &self.status
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            TestStatus::Passed => write!(f, "{} ... ok", self.name),
            TestStatus::Failed(error) => write!(f, "{} ... FAILED: {error:#}", self.name),
            TestStatus::Panicked(message) => write!(f, "{} ... PANICKED: {message}", self.name),
        }
    }
}

/// Outcomes of a suite run, in execution order.
#[derive(Debug)]
pub struct TestReport {
    entry: String,
    outcomes: Vec<TestOutcome>,
}

impl TestReport {
    pub(crate) fn new(entry: &str, outcomes: Vec<TestOutcome>) -> Self {
        Self {
            entry: entry.to_string(),
            outcomes,
        }
    }

    /// Entry type the suite was built from.
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    #[must_use]
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// First outcome for the method `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_passed()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.len() - self.passed()
    }

    /// Whether every method passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} total",
            self.entry,
            self.passed(),
            self.failed(),
            self.len()
        )
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        write!(f, "{}", self.summary())
    }
}
