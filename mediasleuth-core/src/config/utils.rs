//! Configuration utility functions
//!
//! Helpers for reading `MEDIASLEUTH_*` environment overrides with a fallback
//! default. Unparseable values fall back to the default silently.

use std::path::PathBuf;

/// Get a string value from an environment variable or use the default
pub fn get_env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

/// Get a comma separated list from an environment variable or use the default.
/// Empty entries are dropped.
pub fn get_env_list(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(val) => val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

/// Get a u32 value from an environment variable or use the default
pub fn get_env_u32(key: &str, default: u32) -> u32 {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a usize value from an environment variable or use the default
pub fn get_env_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Get a f64 value from an environment variable or use the default
pub fn get_env_f64(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_use_defaults() {
        assert_eq!(get_env_u32("MEDIASLEUTH_TEST_SURELY_UNSET_U32", 7), 7);
        assert_eq!(get_env_f64("MEDIASLEUTH_TEST_SURELY_UNSET_F64", 1.5), 1.5);
        assert_eq!(
            get_env_list("MEDIASLEUTH_TEST_SURELY_UNSET_LIST", &["a", "b"]),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
