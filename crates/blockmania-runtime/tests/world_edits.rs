use std::sync::Arc;

use blockmania_blocks::{BlockId, BlockRegistry};
use blockmania_chunk::{LightKind, NEIGHBOR_OFFSETS, boundary_neighbors};
use blockmania_mesh::{GpuBackend, HeadlessBackend};
use blockmania_runtime::World;
use blockmania_world::{ChunkCoord, ChunkDims, ChunkGenerator, GenTarget, GeneratorSet, WorldConfig};
use proptest::prelude::*;

const DIMS: ChunkDims = ChunkDims::new(8, 20, 8);

struct Floor(BlockId);

impl ChunkGenerator for Floor {
    fn generate(&self, target: &mut dyn GenTarget) {
        let d = target.dims();
        for z in 0..d.z {
            for x in 0..d.x {
                for y in 0..6 {
                    target.put_block(x, y, z, self.0);
                }
            }
        }
    }
}

fn world() -> World {
    let reg = Arc::new(BlockRegistry::builtin());
    let mut set = GeneratorSet::new();
    set.insert("terrain", Floor(reg.id_by_name("stone").unwrap()));
    let backend: Arc<dyn GpuBackend> = Arc::new(HeadlessBackend::new());
    let cfg = WorldConfig {
        chunk: DIMS,
        ..WorldConfig::default()
    };
    let mut w = World::new(cfg, reg, backend).with_generators(set);
    w.process_chunk(ChunkCoord::new(0, 0));
    w
}

#[test]
fn standard_generators_fill_a_chunk() {
    let reg = Arc::new(BlockRegistry::builtin());
    let backend: Arc<dyn GpuBackend> = Arc::new(HeadlessBackend::new());
    let cfg = WorldConfig {
        seed: 1234,
        ..WorldConfig::default()
    };
    let mut w = World::new(cfg, reg, backend);
    let c = ChunkCoord::new(0, 0);
    assert!(w.process_chunk(c));
    assert_ne!(w.get_block(3, 0, 3), 0);
    assert_eq!(w.get_light(3, 127, 3, LightKind::Sky), 15);
    assert!(w.stats().generated >= 9);
    assert!(w.stats().meshed >= 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Only neighbors sharing the edited boundary are invalidated
    #[test]
    fn edits_dirty_exactly_the_adjacent_neighbors(x in 0usize..8, z in 0usize..8) {
        let mut w = world();
        for coord in w.chunks_by_distance() {
            w.chunk(coord).unwrap().set_dirty(false);
        }
        prop_assert!(w.set_block(x as i32, 12, z as i32, 1));
        let expected = boundary_neighbors(x, z, DIMS);
        for (i, (dx, dz)) in NEIGHBOR_OFFSETS.into_iter().enumerate() {
            let dirty = w.chunk(ChunkCoord::new(dx, dz)).unwrap().is_dirty();
            prop_assert_eq!(dirty, expected.contains(&i), "neighbor {}", i);
        }
    }

    // A block read back equals the block written; rewriting it is a no-op
    #[test]
    fn set_block_round_trips(x in -8i32..16, y in 6i32..20, z in -8i32..16, id in 1u8..12) {
        let mut w = world();
        prop_assert!(w.set_block(x, y, z, id));
        prop_assert_eq!(w.get_block(x, y, z), id);
        prop_assert!(!w.set_block(x, y, z, id));
    }

    // A torch placed and removed in open air leaves no block light behind
    #[test]
    fn torch_round_trip_leaves_no_block_light(x in 0i32..8, y in 6i32..19, z in 0i32..8) {
        let mut w = world();
        let torch = w.registry().id_by_name("torch").unwrap();
        prop_assert!(w.set_block(x, y, z, torch));
        prop_assert_eq!(w.get_light(x, y, z, LightKind::Block), 15);
        prop_assert!(w.set_block(x, y, z, 0));
        for wy in 0..20 {
            for wz in -8..16 {
                for wx in -8..16 {
                    prop_assert_eq!(w.get_light(wx, wy, wz, LightKind::Block), 0);
                }
            }
        }
    }
}
