//! Global constants used throughout the harness.
//!
//! Naming conventions, environment variable names, and file names that more
//! than one module needs live here so they stay discoverable.

/// Suffix appended to a class name's entry path (`a.b.C` → `a/b/C.class`).
pub const CLASS_ENTRY_SUFFIX: &str = ".class";

/// Separator between the segments of a class name.
pub const CLASS_NAME_SEPARATOR: char = '.';

/// Separator between the segments of a root entry name.
pub const ENTRY_SEPARATOR: char = '/';

/// Environment variable naming an explicit harness config file.
pub const CONFIG_ENV_VAR: &str = "PATHABLE_CONFIG";

/// Config file looked up in the current directory when no path is given.
pub const PROJECT_CONFIG_FILE: &str = "pathable.toml";

/// Directory under the user's home that holds the user-wide config.
pub const USER_CONFIG_DIR: &str = ".pathable";

/// File name of the user-wide config inside [`USER_CONFIG_DIR`].
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Label of the single level built when no hierarchy is configured.
pub const DEFAULT_ROOT_LABEL: &str = "root";

/// Convert a class name into the entry path that defines it.
///
/// ```rust
/// use pathable_harness::constants::class_entry_name;
///
/// assert_eq!(class_entry_name("org.example.Log"), "org/example/Log.class");
/// ```
pub fn class_entry_name(class_name: &str) -> String {
    let mut entry: String = class_name
        .chars()
        .map(|c| if c == CLASS_NAME_SEPARATOR { ENTRY_SEPARATOR } else { c })
        .collect();
    entry.push_str(CLASS_ENTRY_SUFFIX);
    entry
}
