//! World configuration, chunk coordinates and generator passes.
#![forbid(unsafe_code)]

pub mod config;
pub mod generation;

mod chunk_coord;

pub use chunk_coord::{ChunkCoord, WorldPos};
pub use config::{ChunkDims, TerrainParams, WorldConfig, load_world_config};
pub use generation::{
    ChunkGenerator, ForestGenerator, GenTarget, GeneratorSet, ResourceGenerator,
    TerrainGenerator, GENERATOR_PASSES,
};
