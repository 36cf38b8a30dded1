//! Error handling for the pathable harness
//!
//! This module provides the strongly-typed error enum used by every resolver,
//! catalog, and runner operation, plus a user-facing wrapper that adds
//! suggestions for CLI display.
//!
//! # Architecture
//!
//! - [`HarnessError`] - Enumerated failure cases for catalog, resolver, context, and runner
//! - [`ErrorKind`] - Coarse classification callers assert on (not-found vs. state vs. I/O)
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Lookup misses
//!
//! A class lookup miss is always an error ([`HarnessError::ClassNotFound`]).
//! A resource lookup miss is never an error: resource lookups return `Option`
//! or an empty `Vec`, and only a resource that was found but could not be read
//! surfaces as [`HarnessError::ResourceUnreadable`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use pathable_harness::core::{ErrorKind, HarnessError, user_friendly_error};
//!
//! let error = HarnessError::UnknownLibrary {
//!     name: "commons-logging".to_string(),
//! };
//! assert_eq!(error.kind(), ErrorKind::UnknownLibrary);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for harness operations
///
/// Each variant names the failure precisely enough for tests to assert on it.
/// Use [`HarnessError::kind`] when only the category matters.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A logical library with this name is already registered
    #[error("Logical library '{name}' is already registered")]
    DuplicateLibrary {
        /// Name that was registered twice
        name: String,
    },

    /// A fixture capability with this name is already registered
    #[error("Test fixture '{name}' is already registered")]
    DuplicateFixture {
        /// Symbolic name that was registered twice
        name: String,
    },

    /// A logical library registration was rejected before it reached the catalog
    #[error("Invalid logical library '{name}': {reason}")]
    InvalidLibrary {
        /// Offending library name (may be empty)
        name: String,
        /// Why the registration was rejected
        reason: String,
    },

    /// No logical library with this name is known
    #[error("Logical library '{name}' is not defined")]
    UnknownLibrary {
        /// Name that failed to resolve
        name: String,
    },

    /// No level of the hierarchy, nor the platform, could supply the class
    ///
    /// # Fields
    /// - `name`: The class name that was requested
    /// - `resolver`: Label of the resolver the request was made against
    #[error("Class '{name}' not found via resolver '{resolver}'")]
    ClassNotFound {
        /// Requested class name
        name: String,
        /// Label of the resolver the lookup started at
        resolver: String,
    },

    /// A resolver was reconfigured after it started answering lookups
    #[error("Resolver '{resolver}' is sealed; cannot {operation} after the first lookup")]
    ResolverSealed {
        /// Label of the sealed resolver
        resolver: String,
        /// Mutation that was attempted
        operation: String,
    },

    /// A context scope is already active on this thread
    #[error("An ambient context scope is already active on this thread")]
    ScopeActive,

    /// The process-wide catalog can only be installed once
    #[error("The global library catalog is already installed")]
    CatalogAlreadyInstalled,

    /// A root location could not be opened or indexed
    #[error("Root '{}' is unavailable: {reason}", .path.display())]
    RootUnavailable {
        /// Path of the root
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// A resource was located but its content could not be read
    #[error("Resource '{locator}' was found but could not be read")]
    ResourceUnreadable {
        /// Rendered locator of the resource
        locator: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A hierarchy description is malformed
    #[error("Invalid resolver hierarchy: {reason}")]
    InvalidHierarchy {
        /// What is wrong with the description
        reason: String,
    },

    /// A hierarchy has no level with this label
    #[error("Hierarchy has no level labelled '{label}'")]
    UnknownLevel {
        /// Requested level label
        label: String,
    },

    /// No fixture is registered for the loaded entry type
    #[error("No test fixture registered for entry type '{name}'")]
    UnknownEntry {
        /// Entry type name
        name: String,
    },

    /// A test method selected by name is not part of the suite
    #[error("Suite has no test method named '{name}'")]
    UnknownTest {
        /// Requested method name
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Coarse classification of a [`HarnessError`]
///
/// The categories mirror what callers decide on: a registration clash, an
/// unknown library, a lookup miss, an illegal state transition, or an I/O
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A name was registered twice
    DuplicateName,
    /// A logical library name did not resolve
    UnknownLibrary,
    /// A class, level, entry, or test was not found
    NotFound,
    /// An operation was attempted in the wrong lifecycle state
    State,
    /// Content was located but could not be read
    Io,
    /// Input was structurally invalid
    InvalidInput,
    /// Configuration could not be loaded
    Config,
}

impl HarnessError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateLibrary { .. } | Self::DuplicateFixture { .. } => ErrorKind::DuplicateName,
            Self::UnknownLibrary { .. } => ErrorKind::UnknownLibrary,
            Self::ClassNotFound { .. }
            | Self::UnknownLevel { .. }
            | Self::UnknownEntry { .. }
            | Self::UnknownTest { .. } => ErrorKind::NotFound,
            Self::ResolverSealed { .. } | Self::ScopeActive | Self::CatalogAlreadyInstalled => {
                ErrorKind::State
            }
            Self::RootUnavailable { .. } | Self::ResourceUnreadable { .. } | Self::IoError(_) => {
                ErrorKind::Io
            }
            Self::InvalidLibrary { .. } | Self::InvalidHierarchy { .. } => ErrorKind::InvalidInput,
            Self::ConfigError { .. } => ErrorKind::Config,
        }
    }

    /// Returns `true` for a class lookup miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ClassNotFound { .. })
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps a [`HarnessError`] with an optional suggestion and optional details.
/// The CLI renders it with terminal colors via [`ErrorContext::display`].
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying harness error
    pub error: HarnessError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`HarnessError`]
    #[must_use]
    pub const fn new(error: HarnessError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`HarnessError`] (directly or as the root cause of an
/// [`anyhow`] chain), [`std::io::Error`], and [`toml::de::Error`]. Anything
/// else is wrapped as a configuration error carrying the full context chain.
///
/// # Examples
///
/// ```rust,no_run
/// use pathable_harness::core::{HarnessError, user_friendly_error};
///
/// let error = HarnessError::ClassNotFound {
///     name: "no.such.class".to_string(),
///     resolver: "context".to_string(),
/// };
/// let context = user_friendly_error(anyhow::Error::from(error));
/// context.display();
/// ```
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<HarnessError>() {
        Ok(harness_error) => return create_error_context(harness_error),
        Err(error) => error,
    };

    if let Some(harness_error) = error.root_cause().downcast_ref::<HarnessError>() {
        // Context layers were added on the way up; keep the chain as details.
        let chain = format!("{error:#}");
        return create_error_context(HarnessError::ConfigError {
            message: harness_error.to_string(),
        })
        .with_details(chain);
    }

    if let Some(io_error) = error.downcast_ref::<io::Error>() {
        if io_error.kind() == io::ErrorKind::NotFound {
            return ErrorContext::new(HarnessError::ConfigError {
                message: format!("{error:#}"),
            })
            .with_suggestion("Check that the file or directory exists and the path is correct");
        }
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(HarnessError::ConfigError {
            message: format!("{error:#}"),
        })
        .with_suggestion("Check the TOML syntax of the harness configuration file")
        .with_details("The file must contain a [libraries] table and an optional [hierarchy] table");
    }

    ErrorContext::new(HarnessError::ConfigError {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: HarnessError) -> ErrorContext {
    match &error {
        HarnessError::UnknownLibrary { name } => {
            let suggestion = format!(
                "Add '{name}' to the [libraries] table or place a file starting with '{name}' on a search path"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Logical libraries are resolved by exact name when the hierarchy is built")
        }
        HarnessError::DuplicateLibrary { .. } => ErrorContext::new(error)
            .with_suggestion("Give each logical library a unique name"),
        HarnessError::ClassNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check which libraries are attached to each level with 'pathable libs'")
            .with_details("Classes are searched parent-first unless a level is configured child-first"),
        HarnessError::ResolverSealed { .. } => ErrorContext::new(error)
            .with_details("A resolver's roots and prefixes are fixed once it answers its first lookup"),
        HarnessError::UnknownLevel { .. } => ErrorContext::new(error)
            .with_suggestion("Use one of the labels declared under [[hierarchy.levels]]"),
        HarnessError::RootUnavailable { .. } => ErrorContext::new(error)
            .with_suggestion("Roots must be existing directories or zip archives"),
        HarnessError::InvalidHierarchy { .. } => ErrorContext::new(error)
            .with_suggestion("Declare levels root-first with unique labels, and name existing entry and context levels"),
        _ => ErrorContext::new(error),
    }
}
