//! Error types for the scenario runner
//!
//! Assertion errors are kept apart from everything else so the runner can
//! tell a failed scenario from one that never got a usable response.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for spoiler-check
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    #[error("Authentication failed with status {status}: {message}")]
    AuthenticationFailed { status: u16, message: String },

    #[error("Authentication response did not contain an accessToken")]
    MissingAccessToken,

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    // === Transport Errors ===
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Response from {endpoint} is not valid JSON: {message}")]
    InvalidResponse { endpoint: String, message: String },

    // === Scenario Errors ===
    #[error("{0}")]
    Assertion(String),

    #[error("Skipped: {0}")]
    Skipped(String),

    #[error("{failed} scenario(s) failed, {errored} errored, {skipped} skipped")]
    RunFailed {
        failed: usize,
        errored: usize,
        skipped: usize,
    },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario plan: {0}")]
    Plan(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error for a request to `endpoint`
    pub fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// Create an expected-vs-actual assertion error
    pub fn mismatch<E: std::fmt::Display, A: std::fmt::Display>(
        what: &str,
        expected: E,
        actual: A,
    ) -> Self {
        Self::Assertion(format!("Expected {} {}, got {}", what, expected, actual))
    }

    /// Whether this error is an unmet expectation rather than a transport problem
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}
