//! Error types for the Loader actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoaderError {
    /// Load requests must ask for at least one unit.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
}
