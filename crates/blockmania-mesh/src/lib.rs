//! CPU chunk meshing and the GPU-side mesh handed to chunk slots.
#![forbid(unsafe_code)]

mod chunk_mesh;
mod face;
mod gpu;
mod mesh_build;
mod mesher;
mod view;

pub use chunk_mesh::ChunkMesh;
pub use face::Face;
pub use gpu::{BufferId, GpuBackend, GpuStats, HeadlessBackend};
pub use mesh_build::MeshBuild;
pub use mesher::{FaceMesher, MeshGeometry};
pub use view::{ChunkSnapshot, VoxelView};

#[cfg(test)]
mod tests;
