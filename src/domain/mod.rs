//! # Domain Layer
//!
//! Environment profiles, chat messages, credentials and thread models.
//! This layer performs no I/O.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
