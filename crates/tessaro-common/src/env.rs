//! Environment variable helpers.

/// Read an environment variable, falling back to a default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to a default on
/// absence or parse failure.
pub fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_returns_default_when_unset() {
        assert_eq!(env_or("TESSARO_TEST_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn env_or_parse_returns_default_on_garbage() {
        std::env::set_var("TESSARO_TEST_GARBAGE_PORT", "not-a-number");
        assert_eq!(env_or_parse("TESSARO_TEST_GARBAGE_PORT", 8080u16), 8080);
        std::env::remove_var("TESSARO_TEST_GARBAGE_PORT");
    }

    #[test]
    fn env_or_parse_reads_valid_value() {
        std::env::set_var("TESSARO_TEST_VALID_PORT", "9999");
        assert_eq!(env_or_parse("TESSARO_TEST_VALID_PORT", 8080u16), 9999);
        std::env::remove_var("TESSARO_TEST_VALID_PORT");
    }
}
