//! Data model for the DaleelFM content hierarchy

mod area;
mod content;
mod node;

pub use area::*;
pub use content::*;
pub use node::*;
