//! Declarative description of a resolver chain and its construction.

use crate::catalog::LibraryCatalog;
use crate::core::{HarnessError, HarnessResult};
use crate::resolver::{LayeredResolver, PlatformResolver};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

fn default_parent_first() -> bool {
    true
}

/// One level of a [`HierarchySpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Unique, non-empty label
    pub label: String,
    /// Logical libraries attached in order
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Class-name prefixes passed through to the system tier
    #[serde(default)]
    pub system_prefixes: Vec<String>,
    /// Delegation order for this level
    #[serde(default = "default_parent_first")]
    pub parent_first: bool,
}

impl LevelSpec {
    /// A parent-first level with no libraries.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            libraries: Vec::new(),
            system_prefixes: Vec::new(),
            parent_first: true,
        }
    }

    #[must_use]
    pub fn with_library(mut self, name: impl Into<String>) -> Self {
        self.libraries.push(name.into());
        self
    }

    #[must_use]
    pub fn with_system_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.system_prefixes.push(prefix.into());
        self
    }

    #[must_use]
    pub const fn child_first(mut self) -> Self {
        self.parent_first = false;
        self
    }
}

/// A resolver chain listed root first.
///
/// The entry level loads the suite's entry type; the context level is the
/// resolver installed as ambient context around every test. Both default to
/// the last (leaf) level.
///
/// ```toml
/// [[hierarchy.levels]]
/// label = "parent"
/// libraries = ["commons-logging"]
/// system_prefixes = ["junit."]
///
/// [[hierarchy.levels]]
/// label = "child"
/// libraries = ["testclasses"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchySpec {
    /// Levels, root-most first
    #[serde(default)]
    pub levels: Vec<LevelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_level: Option<String>,
}

impl HierarchySpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level below the current leaf.
    #[must_use]
    pub fn level(mut self, level: LevelSpec) -> Self {
        self.levels.push(level);
        self
    }

    #[must_use]
    pub fn with_entry_level(mut self, label: impl Into<String>) -> Self {
        self.entry_level = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_context_level(mut self, label: impl Into<String>) -> Self {
        self.context_level = Some(label.into());
        self
    }

    /// Label of the entry level after defaulting.
    #[must_use]
    pub fn entry_label(&self) -> Option<&str> {
        self.entry_level.as_deref().or_else(|| self.leaf_label())
    }

    /// Label of the context level after defaulting.
    #[must_use]
    pub fn context_label(&self) -> Option<&str> {
        self.context_level.as_deref().or_else(|| self.leaf_label())
    }

    fn leaf_label(&self) -> Option<&str> {
        self.levels.last().map(|level| level.label.as_str())
    }

    /// Check structure without touching the catalog.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidHierarchy`] for an empty level list, an empty or
    /// repeated label, and [`HarnessError::UnknownLevel`] for an entry or
    /// context label that names no level.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.levels.is_empty() {
            return Err(HarnessError::InvalidHierarchy {
                reason: "at least one level is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for level in &self.levels {
            if level.label.trim().is_empty() {
                return Err(HarnessError::InvalidHierarchy {
                    reason: "level labels must not be empty".to_string(),
                });
            }
            if !seen.insert(level.label.as_str()) {
                return Err(HarnessError::InvalidHierarchy {
                    reason: format!("level label '{}' is used more than once", level.label),
                });
            }
        }

        for label in [&self.entry_level, &self.context_level].into_iter().flatten() {
            if !seen.contains(label.as_str()) {
                return Err(HarnessError::UnknownLevel {
                    label: label.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A built resolver chain.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    levels: Vec<Arc<LayeredResolver>>,
    entry: usize,
    context: usize,
}

impl Hierarchy {
    /// Build every level of `spec`, root first, attaching catalog libraries.
    ///
    /// # Errors
    ///
    /// Validation errors from [`HierarchySpec::validate`], and
    /// [`HarnessError::UnknownLibrary`] for a library missing from `catalog`.
    pub fn build(
        spec: &HierarchySpec,
        catalog: &LibraryCatalog,
        platform: Arc<dyn PlatformResolver>,
    ) -> HarnessResult<Self> {
        spec.validate()?;

        let mut levels: Vec<Arc<LayeredResolver>> = Vec::with_capacity(spec.levels.len());
        for level in &spec.levels {
            let resolver = match levels.last() {
                Some(parent) => LayeredResolver::child(level.label.clone(), parent),
                None => LayeredResolver::root(level.label.clone(), Arc::clone(&platform)),
            };
            for library in &level.libraries {
                resolver.add_logical_lib(library, catalog)?;
            }
            for prefix in &level.system_prefixes {
                resolver.allow_system_prefix(prefix.clone())?;
            }
            resolver.set_parent_first(level.parent_first)?;
            levels.push(resolver);
        }

        let position = |label: Option<&str>| {
            label
                .and_then(|label| levels.iter().position(|level| level.label() == label))
                .unwrap_or(levels.len() - 1)
        };
        let entry = position(spec.entry_label());
        let context = position(spec.context_label());

        debug!(
            "Built hierarchy of {} level(s); entry '{}', context '{}'",
            levels.len(),
            levels[entry].label(),
            levels[context].label()
        );
        Ok(Self {
            levels,
            entry,
            context,
        })
    }

    /// Wrap levels built by hand. `levels` must be a chain, root first.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidHierarchy`] if `levels` is empty or a level's
    /// parent is not the level before it, and [`HarnessError::UnknownLevel`]
    /// for entry or context labels that name no level.
    pub fn from_levels(levels: Vec<Arc<LayeredResolver>>, entry: &str, context: &str) -> HarnessResult<Self> {
        if levels.is_empty() {
            return Err(HarnessError::InvalidHierarchy {
                reason: "at least one level is required".to_string(),
            });
        }
        for pair in levels.windows(2) {
            if !pair[1].parent().is_some_and(|parent| Arc::ptr_eq(parent, &pair[0])) {
                return Err(HarnessError::InvalidHierarchy {
                    reason: format!(
                        "level '{}' is not a child of '{}'",
                        pair[1].label(),
                        pair[0].label()
                    ),
                });
            }
        }

        let position = |label: &str| {
            levels
                .iter()
                .position(|level| level.label() == label)
                .ok_or_else(|| HarnessError::UnknownLevel {
                    label: label.to_string(),
                })
        };
        let entry = position(entry)?;
        let context = position(context)?;
        Ok(Self {
            levels,
            entry,
            context,
        })
    }

    /// Level labelled `label`.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownLevel`] if no level has that label.
    pub fn level(&self, label: &str) -> HarnessResult<&Arc<LayeredResolver>> {
        self.levels
            .iter()
            .find(|level| level.label() == label)
            .ok_or_else(|| HarnessError::UnknownLevel {
                label: label.to_string(),
            })
    }

    /// All levels, root first.
    #[must_use]
    pub fn levels(&self) -> &[Arc<LayeredResolver>] {
        &self.levels
    }

    #[must_use]
    pub fn root(&self) -> &Arc<LayeredResolver> {
        &self.levels[0]
    }

    #[must_use]
    pub fn leaf(&self) -> &Arc<LayeredResolver> {
        &self.levels[self.levels.len() - 1]
    }

    /// Level that loads the entry type.
    #[must_use]
    pub fn entry_resolver(&self) -> &Arc<LayeredResolver> {
        &self.levels[self.entry]
    }

    /// Level installed as ambient context around each test.
    #[must_use]
    pub fn context_resolver(&self) -> &Arc<LayeredResolver> {
        &self.levels[self.context]
    }
}
