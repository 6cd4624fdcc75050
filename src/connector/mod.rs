//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Environment detection from process configuration
//! - OpenAI-compatible chat completions over HTTP
//! - An offline mock chat client

pub mod adapter;

pub use adapter::*;
