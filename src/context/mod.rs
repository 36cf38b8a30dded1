//! The ambient resolution context of the current thread.
//!
//! Code under test that does not receive a resolver explicitly asks
//! [`current`] for the "current context resolver", the same way a logging
//! facade would look up its thread's context loader. Next to the resolver the
//! thread carries a small property map ([`property`], [`set_property`]) that
//! tests use to select implementations; both are restored when a
//! [`ContextScope`] ends.
//!
//! The slot is per thread. A scope entered on one thread is invisible to every
//! other thread, and the guard cannot be sent to another thread to be dropped
//! there.

use crate::core::{HarnessError, HarnessResult};
use crate::resolver::LayeredResolver;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

thread_local! {
    static AMBIENT: RefCell<Option<Arc<LayeredResolver>>> = const { RefCell::new(None) };
    static PROPERTIES: RefCell<BTreeMap<String, String>> = const { RefCell::new(BTreeMap::new()) };
    static SCOPE_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// The resolver currently installed on this thread, if any.
#[must_use]
pub fn current() -> Option<Arc<LayeredResolver>> {
    AMBIENT.with(|slot| slot.borrow().clone())
}

/// Replace this thread's ambient resolver, returning the previous one.
///
/// Inside a [`ContextScope`] the replacement lasts only until the scope ends.
pub fn set_current(resolver: Option<Arc<LayeredResolver>>) -> Option<Arc<LayeredResolver>> {
    AMBIENT.with(|slot| slot.replace(resolver))
}

/// Read an ambient property.
#[must_use]
pub fn property(key: &str) -> Option<String> {
    PROPERTIES.with(|props| props.borrow().get(key).cloned())
}

/// Set an ambient property, returning the previous value.
pub fn set_property(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    PROPERTIES.with(|props| props.borrow_mut().insert(key.into(), value.into()))
}

/// Remove an ambient property, returning its value.
pub fn remove_property(key: &str) -> Option<String> {
    PROPERTIES.with(|props| props.borrow_mut().remove(key))
}

/// Whether a [`ContextScope`] is active on this thread.
#[must_use]
pub fn in_scope() -> bool {
    SCOPE_ACTIVE.with(Cell::get)
}

/// Installs a resolver as this thread's ambient context for its lifetime.
///
/// Entering records the thread's current resolver and a snapshot of the
/// ambient properties. Dropping the guard puts both back, whether the scoped
/// code returned normally, returned an error, or panicked.
///
/// Scopes do not nest: entering a second scope on a thread that already has
/// one fails with [`HarnessError::ScopeActive`].
///
/// # Example
///
/// ```rust,no_run
/// use pathable_harness::context::{self, ContextScope};
/// use pathable_harness::resolver::{LayeredResolver, SystemPlatform};
/// use std::sync::Arc;
///
/// # fn example() -> anyhow::Result<()> {
/// let level = LayeredResolver::root("tests", Arc::new(SystemPlatform::new()));
/// {
///     let _scope = ContextScope::enter(Arc::clone(&level))?;
///     assert!(Arc::ptr_eq(&context::current().unwrap(), &level));
/// }
/// assert!(context::current().is_none());
/// # Ok(())
/// # }
/// ```
#[must_use = "the context is restored as soon as the scope is dropped"]
pub struct ContextScope {
    resolver: Arc<LayeredResolver>,
    previous: Option<Arc<LayeredResolver>>,
    saved_properties: BTreeMap<String, String>,
    _not_send: PhantomData<*const ()>,
}

impl ContextScope {
    /// Install `resolver` on the current thread.
    ///
    /// # Errors
    ///
    /// [`HarnessError::ScopeActive`] if this thread is already inside a scope.
    pub fn enter(resolver: Arc<LayeredResolver>) -> HarnessResult<Self> {
        if SCOPE_ACTIVE.with(|active| active.replace(true)) {
            return Err(HarnessError::ScopeActive);
        }

        let previous = set_current(Some(Arc::clone(&resolver)));
        let saved_properties = PROPERTIES.with(|props| props.borrow().clone());
        debug!(
            "Entered context scope for '{}' (previous: {})",
            resolver.label(),
            previous.as_ref().map_or("none", |p| p.label())
        );

        Ok(Self {
            resolver,
            previous,
            saved_properties,
            _not_send: PhantomData,
        })
    }

    /// The resolver this scope installed.
    #[must_use]
    pub fn resolver(&self) -> &Arc<LayeredResolver> {
        &self.resolver
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        debug!(
            "Leaving context scope for '{}' (restoring: {})",
            self.resolver.label(),
            previous.as_ref().map_or("none", |p| p.label())
        );
        AMBIENT.with(|slot| *slot.borrow_mut() = previous);
        let saved = std::mem::take(&mut self.saved_properties);
        PROPERTIES.with(|props| *props.borrow_mut() = saved);
        SCOPE_ACTIVE.with(|active| active.set(false));
    }
}

impl std::fmt::Debug for ContextScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextScope")
            .field("resolver", &self.resolver.label())
            .field("previous", &self.previous.as_ref().map(|p| p.label()))
            .finish_non_exhaustive()
    }
}
