use blockmania_blocks::BlockId;
use blockmania_chunk::{Chunk, LightKind};
use blockmania_world::{ChunkCoord, ChunkDims};

/// Read-only world-coordinate access used by the mesher.
pub trait VoxelView {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockId;
    fn light(&self, wx: i32, wy: i32, wz: i32, kind: LightKind) -> u8;
}

/// A single chunk seen on its own; neighbors read as air and sentinel light.
impl VoxelView for Chunk {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        Chunk::block(self, wx - self.world_x(), wy, wz - self.world_z())
    }

    fn light(&self, wx: i32, wy: i32, wz: i32, kind: LightKind) -> u8 {
        Chunk::light(self, wx - self.world_x(), wy, wz - self.world_z(), kind)
    }
}

/// Owned copy of one chunk plus a one-cell border in X and Z, so meshing can
/// run off the simulation thread.
#[derive(Clone, Debug)]
pub struct ChunkSnapshot {
    coord: ChunkCoord,
    dims: ChunkDims,
    base_x: i32,
    base_z: i32,
    blocks: Vec<BlockId>,
    sky: Vec<u8>,
    block_light: Vec<u8>,
}

impl ChunkSnapshot {
    pub fn capture<V: VoxelView + ?Sized>(view: &V, coord: ChunkCoord, dims: ChunkDims) -> Self {
        let (hx, hz) = (dims.x + 2, dims.z + 2);
        let n = hx * hz * dims.y;
        let base_x = coord.world_x(dims);
        let base_z = coord.world_z(dims);
        let mut blocks = Vec::with_capacity(n);
        let mut sky = Vec::with_capacity(n);
        let mut block_light = Vec::with_capacity(n);
        for y in 0..dims.y as i32 {
            for z in -1..=dims.z as i32 {
                for x in -1..=dims.x as i32 {
                    let (wx, wz) = (base_x + x, base_z + z);
                    blocks.push(view.block(wx, y, wz));
                    sky.push(view.light(wx, y, wz, LightKind::Sky));
                    block_light.push(view.light(wx, y, wz, LightKind::Block));
                }
            }
        }
        Self {
            coord,
            dims,
            base_x,
            base_z,
            blocks,
            sky,
            block_light,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    fn index(&self, wx: i32, wy: i32, wz: i32) -> Option<usize> {
        let x = wx - self.base_x + 1;
        let z = wz - self.base_z + 1;
        let (hx, hz) = (self.dims.x as i32 + 2, self.dims.z as i32 + 2);
        if x < 0 || z < 0 || wy < 0 || x >= hx || z >= hz || wy >= self.dims.y as i32 {
            return None;
        }
        Some(((wy * hz + z) * hx + x) as usize)
    }
}

impl VoxelView for ChunkSnapshot {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        self.index(wx, wy, wz).map(|i| self.blocks[i]).unwrap_or(0)
    }

    fn light(&self, wx: i32, wy: i32, wz: i32, kind: LightKind) -> u8 {
        match self.index(wx, wy, wz) {
            Some(i) => match kind {
                LightKind::Sky => self.sky[i],
                LightKind::Block => self.block_light[i],
            },
            None => kind.sentinel(),
        }
    }
}
