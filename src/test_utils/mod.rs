//! Test utilities for the harness
//!
//! Builders for archive and directory roots, a ready-made library layout, and
//! one-time logging setup. Available to unit tests and, through the
//! `test-utils` feature, to the integration suite.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathable_harness::test_utils::TestEnvironment;
//! use pathable_harness::test_utils::environment::API_LIBRARY;
//!
//! # fn example() -> anyhow::Result<()> {
//! let env = TestEnvironment::new()?;
//! let catalog = env.catalog()?;
//! assert!(catalog.contains(API_LIBRARY));
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::{ArchiveFixture, DirectoryFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG` when set, otherwise leaves logging off.
///
/// ```bash
/// RUST_LOG=pathable_harness=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
