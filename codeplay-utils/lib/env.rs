//! Utility functions for working with environment variables.

use std::path::PathBuf;

use crate::DEFAULT_CODEPLAY_HOME;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Environment variable for the codeplay home directory
pub const CODEPLAY_HOME_ENV_VAR: &str = "CODEPLAY_HOME";

/// Environment variable for the remote execution endpoint
pub const CODEPLAY_API_URL_ENV_VAR: &str = "CODEPLAY_API_URL";

/// Environment variable for the default execution timeout in milliseconds
pub const CODEPLAY_TIMEOUT_MS_ENV_VAR: &str = "CODEPLAY_TIMEOUT_MS";

/// Environment variable for the per-session cooldown in milliseconds
pub const CODEPLAY_COOLDOWN_MS_ENV_VAR: &str = "CODEPLAY_COOLDOWN_MS";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the path to the codeplay home directory.
/// If the CODEPLAY_HOME environment variable is set, returns that path.
/// Otherwise, returns the default codeplay home path.
pub fn get_codeplay_home_path() -> PathBuf {
    if let Ok(codeplay_home) = std::env::var(CODEPLAY_HOME_ENV_VAR) {
        PathBuf::from(codeplay_home)
    } else {
        DEFAULT_CODEPLAY_HOME.to_owned()
    }
}

/// Returns the value of an environment variable, treating an empty value as unset.
pub fn get_non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_codeplay_home_prefers_env_var() {
        std::env::set_var(CODEPLAY_HOME_ENV_VAR, "/tmp/codeplay-test-home");
        assert_eq!(
            get_codeplay_home_path(),
            PathBuf::from("/tmp/codeplay-test-home")
        );

        std::env::remove_var(CODEPLAY_HOME_ENV_VAR);
        assert_eq!(get_codeplay_home_path(), *DEFAULT_CODEPLAY_HOME);
    }

    #[test]
    #[serial]
    fn test_non_empty_var_ignores_blank_values() {
        std::env::set_var("CODEPLAY_UTILS_TEST_VAR", "   ");
        assert_eq!(get_non_empty_var("CODEPLAY_UTILS_TEST_VAR"), None);

        std::env::set_var("CODEPLAY_UTILS_TEST_VAR", " 42 ");
        assert_eq!(
            get_non_empty_var("CODEPLAY_UTILS_TEST_VAR"),
            Some("42".to_string())
        );

        std::env::remove_var("CODEPLAY_UTILS_TEST_VAR");
        assert_eq!(get_non_empty_var("CODEPLAY_UTILS_TEST_VAR"), None);
    }
}
