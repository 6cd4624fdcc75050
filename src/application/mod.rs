//! # Application Layer
//!
//! The chat client seam and the use cases built on top of it.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
