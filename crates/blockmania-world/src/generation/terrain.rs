use fastnoise_lite::{FastNoiseLite, NoiseType};

use blockmania_blocks::{BlockId, BlockRegistry};

use super::{ChunkGenerator, GenTarget, resolve};
use crate::config::TerrainParams;

/// Heightmap pass: stone below, a few layers of dirt, grass or sand on top.
pub struct TerrainGenerator {
    seed: i32,
    params: TerrainParams,
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
}

impl TerrainGenerator {
    pub fn new(seed: i32, params: TerrainParams, reg: &BlockRegistry) -> Self {
        Self {
            seed,
            params,
            stone: resolve(reg, "stone"),
            dirt: resolve(reg, "dirt"),
            grass: resolve(reg, "grass"),
            sand: resolve(reg, "sand"),
        }
    }

    fn noise(&self) -> FastNoiseLite {
        let mut n = FastNoiseLite::with_seed(self.seed);
        n.set_noise_type(Some(NoiseType::OpenSimplex2));
        n.set_frequency(Some(self.params.frequency));
        n
    }

    /// Surface height for a world column, clamped into the chunk's vertical range.
    pub fn height_at(&self, noise: &FastNoiseLite, wx: i32, wz: i32, max_y: i32) -> i32 {
        let n = noise.get_noise_2d(wx as f32, wz as f32);
        let h = self.params.sea_level + (n * self.params.amplitude) as i32;
        h.clamp(1, (max_y - 1).max(1))
    }
}

impl ChunkGenerator for TerrainGenerator {
    fn generate(&self, target: &mut dyn GenTarget) {
        let dims = target.dims();
        let coord = target.coord();
        let noise = self.noise();
        let base_x = coord.world_x(dims);
        let base_z = coord.world_z(dims);
        for z in 0..dims.z {
            for x in 0..dims.x {
                let h = self.height_at(&noise, base_x + x as i32, base_z + z as i32, dims.y as i32);
                let beach = h <= self.params.sea_level + 1;
                for y in 0..=(h as usize).min(dims.y - 1) {
                    let yi = y as i32;
                    let id = if yi == h {
                        if beach { self.sand } else { self.grass }
                    } else if yi > h - self.params.dirt_depth {
                        if beach { self.sand } else { self.dirt }
                    } else {
                        self.stone
                    };
                    target.put_block(x, y, z, id);
                }
            }
        }
    }
}
