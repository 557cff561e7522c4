//! World store, chunk driver and mesh workers.
#![forbid(unsafe_code)]

mod store;
mod workers;
mod world;

pub use store::{ChunkId, ChunkStore};
pub use workers::{MeshDone, MeshJob, MeshWorkers};
pub use world::{World, WorldStats};
