//! Common utilities shared by the driver and the runner

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Strip trailing slashes from a base URL so paths can be appended verbatim
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:3000/"), "http://localhost:3000");
        assert_eq!(normalize_base_url("http://localhost:3000//"), "http://localhost:3000");
        assert_eq!(normalize_base_url("http://api.test/v1"), "http://api.test/v1");
    }
}
