use blockmania_chunk::storage::linear_index;
use blockmania_chunk::{Chunk, LightKind, NibbleArray, boundary_neighbors};
use blockmania_world::{ChunkCoord, ChunkDims};
use proptest::prelude::*;

fn dims() -> impl Strategy<Value = ChunkDims> {
    (1usize..=6, 1usize..=8, 1usize..=6).prop_map(|(x, y, z)| ChunkDims::new(x, y, z))
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    // linear_index maps each in-bounds cell to a unique in-range index
    #[test]
    fn index_is_unique_and_in_range(d in dims()) {
        let expect = d.volume();
        let mut seen = vec![false; expect];
        for y in 0..d.y as i32 { for z in 0..d.z as i32 { for x in 0..d.x as i32 {
            let i = linear_index(d, x, y, z).unwrap();
            prop_assert!(i < expect);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // Writing one nibble never disturbs any other cell
    #[test]
    fn nibble_writes_are_isolated(d in dims(), vals in proptest::collection::vec(0u8..=15, 48)) {
        let mut arr = NibbleArray::new(d);
        let mut shadow = vec![0u8; d.volume()];
        for (n, v) in vals.iter().enumerate() {
            let i = n % d.volume();
            let x = (i % d.x) as i32;
            let z = ((i / d.x) % d.z) as i32;
            let y = (i / (d.x * d.z)) as i32;
            arr.set(x, y, z, *v);
            shadow[linear_index(d, x, y, z).unwrap()] = *v;
        }
        for y in 0..d.y as i32 { for z in 0..d.z as i32 { for x in 0..d.x as i32 {
            prop_assert_eq!(arr.get(x, y, z), Some(shadow[linear_index(d, x, y, z).unwrap()]));
        }}}
    }

    // Stored light never leaves [0, 15]
    #[test]
    fn light_stays_in_range(x in 0i32..4, y in 0i32..4, z in 0i32..4, v in any::<u8>()) {
        let mut c = Chunk::new(ChunkCoord::new(0, 0), ChunkDims::new(4, 4, 4));
        for kind in LightKind::ALL {
            c.set_light(x, y, z, kind, v);
            prop_assert_eq!(c.light(x, y, z, kind), v.min(15));
        }
    }

    // Codec round trip reproduces all arrays and resets lifecycle flags
    #[test]
    fn codec_round_trip(cx in small_i32(), cz in small_i32(), d in dims(), seed in any::<u64>(), light_dirty in any::<bool>()) {
        let mut c = Chunk::new(ChunkCoord::new(cx, cz), d);
        let mut s = seed;
        for y in 0..d.y as i32 { for z in 0..d.z as i32 { for x in 0..d.x as i32 {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            c.set_block(x, y, z, (s >> 56) as u8);
            c.set_light(x, y, z, LightKind::Sky, ((s >> 40) & 15) as u8);
            c.set_light(x, y, z, LightKind::Block, ((s >> 20) & 15) as u8);
        }}}
        c.set_light_dirty(light_dirty);
        let back = Chunk::from_bytes(&c.to_bytes(), d).unwrap();
        prop_assert_eq!(back.coord(), c.coord());
        prop_assert_eq!(back.blocks(), c.blocks());
        prop_assert_eq!(back.light_array(LightKind::Sky), c.light_array(LightKind::Sky));
        prop_assert_eq!(back.light_array(LightKind::Block), c.light_array(LightKind::Block));
        prop_assert_eq!(back.is_light_dirty(), light_dirty);
        prop_assert!(!back.is_fresh());
        prop_assert!(back.is_dirty());
    }

    // Exactly the neighbors sharing the edited boundary are reported
    #[test]
    fn boundary_neighbors_match_faces(d in dims(), x in 0usize..6, z in 0usize..6) {
        prop_assume!(x < d.x && z < d.z);
        let got = boundary_neighbors(x, z, d);
        let on = |lo: bool, hi: bool, dx: i32| match dx { 1 => hi, -1 => lo, _ => true };
        let offsets = blockmania_chunk::NEIGHBOR_OFFSETS;
        for (i, (dx, dz)) in offsets.iter().enumerate() {
            let expect = on(x == 0, x + 1 == d.x, *dx) && on(z == 0, z + 1 == d.z, *dz);
            prop_assert_eq!(got.contains(&i), expect, "neighbor {} at ({}, {})", i, x, z);
        }
    }
}
