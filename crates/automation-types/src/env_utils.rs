//! Configuration from environment variables.
//!
//! Every tunable in the workspace (RPC endpoint, timeouts, log windows,
//! registry address overrides) is read through these helpers instead of
//! repeating the `std::env::var(..).ok().and_then(..)` chain at each site.
//!
//! ```
//! use automation_types::env_utils::{env_var, env_var_or};
//!
//! let timeout: u64 = env_var_or("AUTOMATION_RPC_TIMEOUT_SECS", 30);
//! let span: Option<u64> = env_var("AUTOMATION_LOG_SPAN");
//! ```

use std::str::FromStr;

/// Read `key` and parse it, ignoring surrounding whitespace.
///
/// Unset and unparseable values both yield `None`.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

/// [`env_var`] with a fallback for unset or unparseable values.
pub fn env_var_or<T: FromStr>(key: &str, fallback: T) -> T {
    env_var(key).unwrap_or(fallback)
}

/// Read `key` as a string. Blank values count as unset.
pub fn env_string_or(key: &str, fallback: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => fallback.to_string(),
    }
}
