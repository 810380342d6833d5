//! Error types

mod api;
mod navigator;
mod validation;

pub use api::*;
pub use navigator::*;
pub use validation::*;

use std::time::Duration;

/// Top-level error type for the DaleelFM client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error during an API call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Form or input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Tree navigation error.
    #[error(transparent)]
    Navigator(#[from] NavigatorError),

    /// The server rate limited the request and retries were exhausted.
    #[error("Rate limited")]
    RateLimit {
        /// Suggested wait before retrying, from the Retry-After header.
        retry_after: Option<Duration>,
    },

    /// The operation was cancelled via the client's cancellation token.
    #[error("Operation cancelled")]
    Cancelled,
}
