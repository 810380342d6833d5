//! Request pacing
//!
//! Retry-with-backoff and concurrency limiting applied by the client to
//! every outgoing request. Individual callers (the tree navigator, the
//! content views) never retry themselves; transient-failure handling lives
//! entirely in this layer.

mod concurrency;
mod retry;

pub use concurrency::*;
pub use retry::*;
