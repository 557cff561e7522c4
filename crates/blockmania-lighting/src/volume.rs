use blockmania_blocks::BlockId;
use blockmania_chunk::{Chunk, LightKind};
use blockmania_world::WorldPos;

/// World-coordinate view of light and block data.
pub trait LightVolume {
    /// Number of cells in a column.
    fn height(&self) -> i32;
    fn light(&self, p: WorldPos, kind: LightKind) -> u8;
    /// Writes are dropped where [`LightVolume::accepts_light`] is false.
    fn set_light(&mut self, p: WorldPos, kind: LightKind, v: u8);
    fn block(&self, p: WorldPos) -> BlockId;
    /// Whether `p` is inside a resident, generated part of the volume.
    fn accepts_light(&self, p: WorldPos) -> bool;
}

/// A single chunk seen as a light volume, used before the chunk joins the world.
///
/// Writes are raw: no dirty marking, no neighbor invalidation. Cells outside
/// the chunk read as the chunk's sentinels and reject writes.
pub struct ChunkVolume<'a> {
    chunk: &'a mut Chunk,
    base_x: i32,
    base_z: i32,
}

impl<'a> ChunkVolume<'a> {
    pub fn new(chunk: &'a mut Chunk) -> Self {
        let base_x = chunk.world_x();
        let base_z = chunk.world_z();
        Self {
            chunk,
            base_x,
            base_z,
        }
    }

    #[inline]
    fn local(&self, p: WorldPos) -> (i32, i32, i32) {
        (p.x - self.base_x, p.y, p.z - self.base_z)
    }
}

impl LightVolume for ChunkVolume<'_> {
    fn height(&self) -> i32 {
        self.chunk.dims().y as i32
    }

    fn light(&self, p: WorldPos, kind: LightKind) -> u8 {
        let (x, y, z) = self.local(p);
        self.chunk.light(x, y, z, kind)
    }

    fn set_light(&mut self, p: WorldPos, kind: LightKind, v: u8) {
        let (x, y, z) = self.local(p);
        self.chunk.put_light(x, y, z, kind, v);
    }

    fn block(&self, p: WorldPos) -> BlockId {
        let (x, y, z) = self.local(p);
        self.chunk.block(x, y, z)
    }

    fn accepts_light(&self, p: WorldPos) -> bool {
        let (x, y, z) = self.local(p);
        self.chunk.dims().contains(x, y, z)
    }
}
