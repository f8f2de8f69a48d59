//! Application-wide constants.

/// Name used for data/config directories and log prefixes.
pub const APP_NAME: &str = "holen";

/// Binary names that select the management CLI instead of shim dispatch.
pub const MANAGEMENT_NAMES: &[&str] = &["holen", "hln"];

/// Strategy lookup order used when `strategy.priority` is unset or empty.
pub const DEFAULT_PRIORITY: &str = "docker,binary";

/// Configuration key holding the comma-separated strategy priority.
pub const PRIORITY_KEY: &str = "strategy.priority";

/// Configuration section whose keys name git manifest sources.
pub const SOURCE_SECTION: &str = "source";

/// System-wide configuration file (Unix).
pub const SYSTEM_CONFIG: &str = "/etc/holenconfig";

/// Environment variable that relocates the system configuration file.
pub const SYSTEM_CONFIG_ENV: &str = "HOLEN_SYSTEM_CONFIG";

/// Directory name holding manifests, both locally and inside sources.
pub const MANIFESTS_DIR: &str = "manifests";
