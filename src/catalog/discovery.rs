//! Locating a logical library on a search path by file name.

use crate::core::{HarnessError, HarnessResult};
use std::path::PathBuf;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Find the root on `search_dirs` that best matches the library `name`.
///
/// Only the immediate children of each search directory are considered. A
/// child matches when its file name starts with `name`. The shortest matching
/// file name wins, so `commons-logging` picks `commons-logging-1.1.jar` over
/// `commons-logging-adapters-1.1.jar`. Ties go to the earlier search
/// directory, then to the file name that sorts first.
///
/// # Errors
///
/// [`HarnessError::UnknownLibrary`] if no child of any search directory
/// matches. Search directories that do not exist are skipped.
pub fn discover_root(name: &str, search_dirs: &[PathBuf]) -> HarnessResult<PathBuf> {
    let mut best: Option<(usize, PathBuf)> = None;

    for dir in search_dirs {
        if !dir.is_dir() {
            trace!("Skipping missing search directory {}", dir.display());
            continue;
        }

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let file_name = entry.file_name().to_string_lossy();
            if !file_name.starts_with(name) {
                continue;
            }
            let len = file_name.len();
            if best.as_ref().is_none_or(|(best_len, _)| len < *best_len) {
                best = Some((len, entry.into_path()));
            }
        }
    }

    match best {
        Some((_, path)) => {
            debug!("Discovered logical library '{}' at {}", name, path.display());
            Ok(path)
        }
        None => Err(HarnessError::UnknownLibrary {
            name: name.to_string(),
        }),
    }
}
