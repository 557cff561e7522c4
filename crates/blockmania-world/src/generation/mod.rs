//! Named generator passes that populate a fresh chunk's block ids.

mod forest;
mod resources;
mod terrain;

use std::collections::HashMap;

use blockmania_blocks::{BlockId, BlockRegistry};

use crate::chunk_coord::ChunkCoord;
use crate::config::{ChunkDims, TerrainParams};

pub use forest::ForestGenerator;
pub use resources::ResourceGenerator;
pub use terrain::TerrainGenerator;

/// Passes applied to every fresh chunk, in this order.
pub const GENERATOR_PASSES: [&str; 3] = ["terrain", "resources", "forest"];

/// Write access a generator gets to the chunk being populated.
/// Writes are raw: no dirty flags, no neighbor invalidation, no lighting.
pub trait GenTarget {
    fn coord(&self) -> ChunkCoord;
    fn dims(&self) -> ChunkDims;
    fn block(&self, x: usize, y: usize, z: usize) -> BlockId;
    fn put_block(&mut self, x: usize, y: usize, z: usize, id: BlockId);
}

pub trait ChunkGenerator: Send + Sync {
    fn generate(&self, target: &mut dyn GenTarget);
}

#[derive(Default)]
pub struct GeneratorSet {
    passes: HashMap<String, Box<dyn ChunkGenerator>>,
}

impl GeneratorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terrain, resources and forest passes configured from the world seed.
    pub fn standard(seed: i32, params: &TerrainParams, reg: &BlockRegistry) -> Self {
        let mut set = Self::new();
        set.insert("terrain", TerrainGenerator::new(seed, params.clone(), reg));
        set.insert("resources", ResourceGenerator::new(seed, params.ore_veins, reg));
        set.insert("forest", ForestGenerator::new(seed, params.clone(), reg));
        set
    }

    pub fn insert(&mut self, name: &str, generator: impl ChunkGenerator + 'static) {
        self.passes.insert(name.to_string(), Box::new(generator));
    }

    pub fn get(&self, name: &str) -> Option<&dyn ChunkGenerator> {
        self.passes.get(name).map(|g| g.as_ref())
    }

    /// Runs every registered pass from [`GENERATOR_PASSES`]; unregistered names are skipped.
    pub fn run_all(&self, target: &mut dyn GenTarget) {
        for name in GENERATOR_PASSES {
            match self.get(name) {
                Some(g) => g.generate(target),
                None => log::trace!("generator pass '{}' not registered; skipping", name),
            }
        }
    }
}

// Resolves a block by name, falling back to air for block sets that lack it.
pub(crate) fn resolve(reg: &BlockRegistry, name: &str) -> BlockId {
    reg.id_by_name(name).unwrap_or(blockmania_blocks::types::AIR)
}

/// Stateless per-position hash so generation does not depend on chunk visit order.
#[inline]
pub(crate) fn hash3(seed: i32, x: i32, z: i32, salt: u32) -> u32 {
    let mut h = (seed as u32) ^ salt.wrapping_mul(0x9E37_79B9);
    h ^= (x as u32).wrapping_mul(0x85EB_CA6B);
    h = h.rotate_left(13) ^ (z as u32).wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846C_A68B);
    h ^ (h >> 16)
}

#[inline]
pub(crate) fn unit(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    pub struct VecTarget {
        pub coord: ChunkCoord,
        pub dims: ChunkDims,
        pub blocks: Vec<BlockId>,
    }

    impl VecTarget {
        pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
            Self {
                coord,
                dims,
                blocks: vec![0; dims.volume()],
            }
        }

        fn idx(&self, x: usize, y: usize, z: usize) -> usize {
            (y * self.dims.z + z) * self.dims.x + x
        }
    }

    impl GenTarget for VecTarget {
        fn coord(&self) -> ChunkCoord {
            self.coord
        }
        fn dims(&self) -> ChunkDims {
            self.dims
        }
        fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
            self.blocks[self.idx(x, y, z)]
        }
        fn put_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
            let i = self.idx(x, y, z);
            self.blocks[i] = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::VecTarget;
    use super::*;

    #[test]
    fn standard_set_is_deterministic() {
        let reg = BlockRegistry::builtin();
        let params = TerrainParams::default();
        let dims = ChunkDims::new(16, 96, 16);
        let set = GeneratorSet::standard(1234, &params, &reg);
        let mut a = VecTarget::new(ChunkCoord::new(3, -2), dims);
        let mut b = VecTarget::new(ChunkCoord::new(3, -2), dims);
        set.run_all(&mut a);
        set.run_all(&mut b);
        assert_eq!(a.blocks, b.blocks);
        assert!(a.blocks.iter().any(|&id| id != 0));
    }

    #[test]
    fn empty_set_leaves_chunk_untouched() {
        let mut t = VecTarget::new(ChunkCoord::new(0, 0), ChunkDims::new(4, 8, 4));
        GeneratorSet::new().run_all(&mut t);
        assert!(t.blocks.iter().all(|&id| id == 0));
    }
}
