//! Lazy hierarchical tree navigation
//!
//! The sidebar state machine behind every content browser: a forest of
//! nodes loaded on demand, an expanded set, a single shared loading
//! indicator, and the currently selected leaf. State transitions live in
//! [`TreeState`] as pure functions; [`TreeNavigator`] layers the async
//! child-fetch orchestration (single-flight, cancellation, cold-load path
//! restoration) on top.

mod fetcher;
mod navigator;
mod tree;

pub use fetcher::*;
pub use navigator::*;
pub use tree::*;
