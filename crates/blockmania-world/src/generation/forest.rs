use blockmania_blocks::{BlockId, BlockRegistry};

use super::{ChunkGenerator, GenTarget, hash3, resolve, unit};
use crate::config::TerrainParams;

const LEAF_RADIUS: usize = 2;

/// Trees and ground cover on grass. Trees stay clear of chunk edges so a pass
/// never has to write into a neighbor.
pub struct ForestGenerator {
    seed: i32,
    params: TerrainParams,
    grass: BlockId,
    log: BlockId,
    leaves: BlockId,
    tall_grass: BlockId,
    flower: BlockId,
}

impl ForestGenerator {
    pub fn new(seed: i32, params: TerrainParams, reg: &BlockRegistry) -> Self {
        Self {
            seed,
            params,
            grass: resolve(reg, "grass"),
            log: resolve(reg, "log"),
            leaves: resolve(reg, "leaves"),
            tall_grass: resolve(reg, "tall_grass"),
            flower: resolve(reg, "red_flower"),
        }
    }

    fn surface(target: &dyn GenTarget, x: usize, z: usize) -> Option<usize> {
        (0..target.dims().y).rev().find(|&y| target.block(x, y, z) != 0)
    }

    fn place_tree(&self, target: &mut dyn GenTarget, x: usize, ground: usize, z: usize, h: u32) {
        let dims = target.dims();
        let trunk = 4 + (h >> 20) as usize % 3;
        let top = ground + trunk;
        if top + 2 >= dims.y {
            return;
        }
        for y in ground + 1..=top {
            target.put_block(x, y, z, self.log);
        }
        for y in top - 1..=top + 1 {
            let r = if y > top { LEAF_RADIUS - 1 } else { LEAF_RADIUS };
            for lz in z - r..=z + r {
                for lx in x - r..=x + r {
                    if target.block(lx, y, lz) == 0 {
                        target.put_block(lx, y, lz, self.leaves);
                    }
                }
            }
        }
    }
}

impl ChunkGenerator for ForestGenerator {
    fn generate(&self, target: &mut dyn GenTarget) {
        let dims = target.dims();
        let coord = target.coord();
        let base_x = coord.world_x(dims);
        let base_z = coord.world_z(dims);
        for z in 0..dims.z {
            for x in 0..dims.x {
                let Some(ground) = Self::surface(target, x, z) else {
                    continue;
                };
                if target.block(x, ground, z) != self.grass || ground + 1 >= dims.y {
                    continue;
                }
                let h = hash3(self.seed, base_x + x as i32, base_z + z as i32, 0xF0E5);
                let roll = unit(h);
                let inner = x >= LEAF_RADIUS
                    && z >= LEAF_RADIUS
                    && x + LEAF_RADIUS < dims.x
                    && z + LEAF_RADIUS < dims.z;
                if inner && roll < self.params.tree_chance {
                    self.place_tree(target, x, ground, z, h);
                } else if roll < self.params.tree_chance + self.params.grass_chance
                    && target.block(x, ground + 1, z) == 0
                {
                    let id = if h & 0xF == 0 { self.flower } else { self.tall_grass };
                    target.put_block(x, ground + 1, z, id);
                }
            }
        }
    }
}
