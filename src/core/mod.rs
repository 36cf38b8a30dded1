//! Core types for the pathable harness
//!
//! This module holds the pieces every other module depends on: the error
//! enum and its user-facing context wrapper.
//!
//! # Error Management
//!
//! The harness distinguishes lookup misses by primitive:
//! - Class lookups fail with [`HarnessError::ClassNotFound`]
//! - Resource lookups return an empty value; only a found-but-unreadable
//!   resource yields [`HarnessError::ResourceUnreadable`]
//!
//! [`ErrorKind`] gives callers a coarse category to match on, and
//! [`user_friendly_error`] turns any [`anyhow::Error`] into an
//! [`ErrorContext`] with suggestions for CLI display.
//!
//! # Example
//!
//! ```rust
//! use pathable_harness::core::{ErrorKind, HarnessError};
//!
//! fn lookup() -> Result<(), HarnessError> {
//!     Err(HarnessError::ClassNotFound {
//!         name: "no.such.class".to_string(),
//!         resolver: "child".to_string(),
//!     })
//! }
//!
//! let err = lookup().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! ```

pub mod error;

pub use error::{ErrorContext, ErrorKind, HarnessError, user_friendly_error};

/// Result alias for operations that fail with a [`HarnessError`].
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;
