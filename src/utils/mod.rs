//! Utility functions and helpers for vision-relay.
//!
//! - `logging`: Tracing initialization and secret redaction.

pub mod logging;
