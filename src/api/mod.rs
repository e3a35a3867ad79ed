//! Story Spoiler HTTP API
//!
//! The session bootstrap and one method per endpoint. Responses are returned
//! as-is; judging them is the runner's job.

mod client;
pub mod types;

pub use client::Session;
pub use types::{ApiResponse, Credentials, StoryDraft};
