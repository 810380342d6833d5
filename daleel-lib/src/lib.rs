//! DaleelFM content client library
//!
//! A Rust async client for the DaleelFM medical-education platform: the
//! hierarchical content browsers (Protocols, PowerPoints, The Essentials,
//! The Handbook), the lazy tree navigator behind their sidebars, and the
//! exam-creation form.

pub mod api;
pub mod cache;
pub mod error;
pub mod exam;
pub mod model;
pub mod navigator;
pub mod rate_limit;
pub mod response;
pub mod selection;

mod client;

pub use client::*;
pub use response::CacheStatus;
pub use response::Response;
