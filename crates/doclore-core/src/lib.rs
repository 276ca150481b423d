//! Doclore Core - Core types and domain models for the Doclore knowledge base.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;
