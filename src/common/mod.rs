//! Common utilities shared by the CLI and the runner

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Mask a secret for display, keeping only its length visible
pub fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("deso123"), "*******");
        assert_eq!(mask_secret(""), "");
    }
}
