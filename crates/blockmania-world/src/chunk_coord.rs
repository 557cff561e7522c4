use serde::{Deserialize, Serialize};

use crate::config::ChunkDims;

/// Grid position of a chunk. The world is only chunked along X and Z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chunk containing the given world block column.
    #[inline]
    pub fn containing(wx: i32, wz: i32, dims: ChunkDims) -> Self {
        Self {
            x: wx.div_euclid(dims.x as i32),
            z: wz.div_euclid(dims.z as i32),
        }
    }

    /// World-space X of the chunk's first block column.
    #[inline]
    pub fn world_x(self, dims: ChunkDims) -> i32 {
        self.x * dims.x as i32
    }

    #[inline]
    pub fn world_z(self, dims: ChunkDims) -> i32 {
        self.z * dims.z as i32
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Absolute block position. Y is not wrapped; values outside `0..dims.y` are above or below the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Owning chunk and chunk-local coordinates. `None` when Y is outside the world.
    #[inline]
    pub fn split(self, dims: ChunkDims) -> Option<(ChunkCoord, usize, usize, usize)> {
        if self.y < 0 || self.y >= dims.y as i32 {
            return None;
        }
        let coord = ChunkCoord::containing(self.x, self.z, dims);
        let lx = self.x.rem_euclid(dims.x as i32) as usize;
        let lz = self.z.rem_euclid(dims.z as i32) as usize;
        Some((coord, lx, self.y as usize, lz))
    }
}
