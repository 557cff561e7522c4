//! Block types and the block registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType};
pub use types::{BlockForm, BlockId};
