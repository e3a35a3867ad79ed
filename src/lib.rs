//! spoiler-check - end-to-end scenarios for the Story Spoiler API
//!
//! Authenticates once, then creates, edits, lists and deletes a story and
//! exercises the service's error paths, reporting each scenario separately.

pub mod api;
pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;
