//! The delegation algorithm shared by every level.
//!
//! # Ordering rules
//!
//! For a parent-first level (the default):
//!
//! 1. Classes matching a system prefix registered on the level go straight to
//!    the platform's system tier; classes matching an explicit-resolver prefix
//!    go to that resolver. Nothing else is consulted for them.
//! 2. Otherwise the parent answers first (the root-most level's parent is the
//!    bootstrap tier), recursively, so the highest level that can supply a
//!    name wins and its origin is returned unchanged.
//! 3. Otherwise the level's own roots are searched in registration order.
//!
//! Multi-resource enumeration collects the full ancestor result first and
//! appends the level's own matches, keeping duplicates.
//!
//! A child-first level searches its own roots before its parent and lists its
//! own resources first. Names the bootstrap tier owns are still answered by
//! bootstrap before a child-first level's roots.

use super::layered::{LayeredResolver, LevelConfig};
use super::types::ClassHandle;
use crate::constants::class_entry_name;
use crate::core::{HarnessError, HarnessResult};
use crate::root::ResourceLocator;
use tracing::{debug, trace};

pub(crate) fn find_class(resolver: &LayeredResolver, name: &str) -> HarnessResult<ClassHandle> {
    let config = resolver.config();

    if let Some(prefix) = matching_prefix(&config.system_prefixes, name) {
        debug!(
            "Class '{}' matches system prefix '{}' on '{}'; asking the platform",
            name,
            prefix,
            resolver.label()
        );
        return resolver
            .platform()
            .system_class(name)
            .ok_or_else(|| not_found(resolver, name));
    }

    if let Some((prefix, target)) = config
        .explicit
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix.as_str()))
    {
        debug!(
            "Class '{}' matches explicit prefix '{}' on '{}'; asking '{}'",
            name,
            prefix,
            resolver.label(),
            target.label()
        );
        return target.find_class(name);
    }

    let found = if config.parent_first {
        match delegate_class(resolver, name)? {
            Some(handle) => Some(handle),
            None => own_class(resolver, config, name),
        }
    } else if let Some(handle) = resolver.platform().bootstrap_class(name) {
        Some(handle)
    } else {
        match own_class(resolver, config, name) {
            Some(handle) => Some(handle),
            None => delegate_class(resolver, name)?,
        }
    };

    match found {
        Some(handle) => {
            trace!("Class '{}' requested at '{}' answered by {}", name, resolver.label(), handle.defined_by());
            Ok(handle)
        }
        None => Err(not_found(resolver, name)),
    }
}

pub(crate) fn find_resource(resolver: &LayeredResolver, name: &str) -> Option<ResourceLocator> {
    let config = resolver.config();

    let found = if config.parent_first {
        delegate_resource(resolver, name).or_else(|| own_resource(config, name))
    } else {
        own_resource(config, name).or_else(|| delegate_resource(resolver, name))
    };

    match &found {
        Some(locator) => trace!("Resource '{}' at '{}' found at {}", name, resolver.label(), locator),
        None => trace!("Resource '{}' not visible from '{}'", name, resolver.label()),
    }
    found
}

pub(crate) fn find_all_resources(resolver: &LayeredResolver, name: &str) -> Vec<ResourceLocator> {
    let config = resolver.config();

    let inherited = match resolver.parent() {
        Some(parent) => parent.find_all_resources(name),
        None => resolver.platform().bootstrap_resources(name),
    };
    let own = config.roots.iter().filter_map(|root| root.locate(name));

    let all: Vec<ResourceLocator> = if config.parent_first {
        inherited.into_iter().chain(own).collect()
    } else {
        own.chain(inherited).collect()
    };

    trace!("Resource '{}' has {} match(es) visible from '{}'", name, all.len(), resolver.label());
    all
}

/// Ask the parent, or bootstrap for the root-most level.
fn delegate_class(resolver: &LayeredResolver, name: &str) -> HarnessResult<Option<ClassHandle>> {
    match resolver.parent() {
        Some(parent) => match parent.find_class(name) {
            Ok(handle) => Ok(Some(handle)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        },
        None => Ok(resolver.platform().bootstrap_class(name)),
    }
}

fn delegate_resource(resolver: &LayeredResolver, name: &str) -> Option<ResourceLocator> {
    match resolver.parent() {
        Some(parent) => parent.find_resource(name),
        None => resolver.platform().bootstrap_resource(name),
    }
}

fn own_class(resolver: &LayeredResolver, config: &LevelConfig, name: &str) -> Option<ClassHandle> {
    let entry = class_entry_name(name);
    config
        .roots
        .iter()
        .find_map(|root| root.locate(&entry))
        .map(|locator| ClassHandle::level(name, resolver.id(), resolver.label(), locator))
}

fn own_resource(config: &LevelConfig, name: &str) -> Option<ResourceLocator> {
    config.roots.iter().find_map(|root| root.locate(name))
}

fn matching_prefix<'a>(prefixes: &'a [String], name: &str) -> Option<&'a str> {
    prefixes
        .iter()
        .map(String::as_str)
        .find(|prefix| name.starts_with(prefix))
}

fn not_found(resolver: &LayeredResolver, name: &str) -> HarnessError {
    HarnessError::ClassNotFound {
        name: name.to_string(),
        resolver: resolver.label().to_string(),
    }
}
