use blockmania_blocks::BlockRegistry;
use blockmania_chunk::{Chunk, LightKind, MAX_LIGHT};
use blockmania_world::{ChunkCoord, ChunkDims, WorldPos};

use crate::propagate::{refresh_light_at, spread_light, unspread_light};
use crate::volume::{ChunkVolume, LightVolume};

/// Re-seeds sky light for the world column `(x, z)`, top down.
///
/// Cells above the first sky-covering block get 15 when they are invisible or
/// billboards and 0 otherwise. Cells at and below it get 0, then optionally a
/// neighbor-based refresh. With `spread`, a cell whose value rose is spread
/// and one whose value fell is retracted.
pub fn refresh_sunlight_column<V: LightVolume + ?Sized>(
    vol: &mut V,
    reg: &BlockRegistry,
    x: i32,
    z: i32,
    spread: bool,
    refresh: bool,
) {
    let mut covered = false;
    for y in (0..vol.height()).rev() {
        let p = WorldPos::new(x, y, z);
        let ty = reg.get(vol.block(p));
        if ty.covers_sky() {
            covered = true;
        }
        let old = vol.light(p, LightKind::Sky);
        if !covered {
            let v = if ty.invisible || ty.is_billboard() { MAX_LIGHT } else { 0 };
            vol.set_light(p, LightKind::Sky, v);
        } else {
            vol.set_light(p, LightKind::Sky, 0);
            if refresh {
                refresh_light_at(vol, reg, p, LightKind::Sky);
            }
        }
        let new = vol.light(p, LightKind::Sky);
        if spread {
            if old > new {
                unspread_light(vol, reg, p, LightKind::Sky, old);
            } else if old < new {
                spread_light(vol, reg, p, LightKind::Sky, new);
            }
        }
    }
}

/// Seeds sky light in a freshly generated chunk, column by column, without spreading.
pub fn generate_sunlight(chunk: &mut Chunk, reg: &BlockRegistry) {
    let dims = chunk.dims();
    let (bx, bz) = (chunk.world_x(), chunk.world_z());
    let mut vol = ChunkVolume::new(chunk);
    for x in 0..dims.x as i32 {
        for z in 0..dims.z as i32 {
            refresh_sunlight_column(&mut vol, reg, bx + x, bz + z, false, false);
        }
    }
}

/// Re-spreads light from every lit cell of one chunk into the volume.
///
/// Sky light spreads from lit translucent cells; block light also spreads
/// from emissive blocks.
pub fn relight_chunk<V: LightVolume + ?Sized>(
    vol: &mut V,
    reg: &BlockRegistry,
    coord: ChunkCoord,
    dims: ChunkDims,
) {
    let bx = coord.world_x(dims);
    let bz = coord.world_z(dims);
    for x in 0..dims.x as i32 {
        for z in 0..dims.z as i32 {
            for y in 0..dims.y as i32 {
                let p = WorldPos::new(bx + x, y, bz + z);
                let ty = reg.get(vol.block(p));
                let sky = vol.light(p, LightKind::Sky);
                if sky > 0 && ty.translucent {
                    spread_light(vol, reg, p, LightKind::Sky, sky);
                }
                let blk = vol.light(p, LightKind::Block);
                if blk > 0 && (ty.translucent || ty.luminance > 0) {
                    spread_light(vol, reg, p, LightKind::Block, blk);
                }
            }
        }
    }
}
