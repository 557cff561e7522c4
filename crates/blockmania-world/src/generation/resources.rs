use blockmania_blocks::{BlockId, BlockRegistry};

use super::{ChunkGenerator, GenTarget, hash3, resolve};

/// Scatters small ore blobs, replacing stone only.
pub struct ResourceGenerator {
    seed: i32,
    veins: u32,
    stone: BlockId,
    ore: BlockId,
}

impl ResourceGenerator {
    pub fn new(seed: i32, veins: u32, reg: &BlockRegistry) -> Self {
        Self {
            seed,
            veins,
            stone: resolve(reg, "stone"),
            ore: resolve(reg, "coal_ore"),
        }
    }
}

impl ChunkGenerator for ResourceGenerator {
    fn generate(&self, target: &mut dyn GenTarget) {
        let dims = target.dims();
        let coord = target.coord();
        for vein in 0..self.veins {
            let h = hash3(self.seed, coord.x, coord.z, 0x0AE5 + vein);
            let cx = (h % dims.x as u32) as usize;
            let cy = ((h >> 8) % dims.y as u32) as usize;
            let cz = ((h >> 16) % dims.z as u32) as usize;
            let size = 2 + (h >> 28) as usize % 4;
            for i in 0..size {
                let step = hash3(self.seed, h as i32, i as i32, 0x51DE);
                let x = (cx + (step & 1) as usize).min(dims.x - 1);
                let y = (cy + ((step >> 1) & 1) as usize).min(dims.y - 1);
                let z = (cz + ((step >> 2) & 1) as usize).min(dims.z - 1);
                if target.block(x, y, z) == self.stone {
                    target.put_block(x, y, z, self.ore);
                }
            }
        }
    }
}
