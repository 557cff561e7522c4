//! A chunk: block ids, sky and block light, lifecycle flags and mesh slots.
#![forbid(unsafe_code)]

pub mod codec;
pub mod handle;
pub mod neighbors;
pub mod storage;

use std::fmt;

use blockmania_blocks::{BlockId, BlockRegistry};
use blockmania_geom::{Aabb, Vec3};
use blockmania_world::{ChunkCoord, ChunkDims, GenTarget};

pub use handle::{ChunkHandle, ChunkShared, MeshPhase, RenderMesh, RenderType};
pub use neighbors::{NEIGHBOR_OFFSETS, boundary_neighbors};
pub use storage::{BlockArray, NibbleArray};

/// The two light channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Sky,
    Block,
}

impl LightKind {
    pub const ALL: [LightKind; 2] = [LightKind::Sky, LightKind::Block];

    /// Value reported for cells outside the stored volume.
    #[inline]
    pub const fn sentinel(self) -> u8 {
        match self {
            LightKind::Sky => 15,
            LightKind::Block => 0,
        }
    }
}

pub const MAX_LIGHT: u8 = 15;

pub struct Chunk {
    coord: ChunkCoord,
    dims: ChunkDims,
    blocks: BlockArray,
    sunlight: NibbleArray,
    block_light: NibbleArray,
    shared: ChunkHandle,
}

impl Chunk {
    /// A fresh chunk: all air, no light, dirty and light dirty.
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        Self {
            coord,
            dims,
            blocks: BlockArray::new(dims),
            sunlight: NibbleArray::new(dims),
            block_light: NibbleArray::new(dims),
            shared: ChunkHandle::new(ChunkShared::new(coord)),
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

    /// Shared flag and mesh state for the render thread.
    pub fn handle(&self) -> ChunkHandle {
        self.shared.clone()
    }

    #[inline]
    pub fn shared(&self) -> &ChunkShared {
        &self.shared
    }

    #[inline]
    pub fn blocks(&self) -> &BlockArray {
        &self.blocks
    }

    #[inline]
    pub fn light_array(&self, kind: LightKind) -> &NibbleArray {
        match kind {
            LightKind::Sky => &self.sunlight,
            LightKind::Block => &self.block_light,
        }
    }

    /// Block id at a local position; air outside the chunk.
    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.blocks.get(x, y, z).unwrap_or(0)
    }

    /// Returns true when the stored value changed. Marks the chunk dirty on change.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        match self.blocks.set(x, y, z, id) {
            Some(old) if old != id => {
                self.set_dirty(true);
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn light(&self, x: i32, y: i32, z: i32, kind: LightKind) -> u8 {
        self.light_array(kind)
            .get(x, y, z)
            .unwrap_or(kind.sentinel())
    }

    /// Clamps to [0, 15]. Returns true when the stored value changed.
    pub fn set_light(&mut self, x: i32, y: i32, z: i32, kind: LightKind, v: u8) -> bool {
        let v = v.min(MAX_LIGHT);
        let arr = match kind {
            LightKind::Sky => &mut self.sunlight,
            LightKind::Block => &mut self.block_light,
        };
        match arr.set(x, y, z, v) {
            Some(old) if old != v => {
                self.set_dirty(true);
                true
            }
            _ => false,
        }
    }

    /// Whether nothing but translucent blocks lie between `y` (inclusive) and the top.
    pub fn can_block_see_the_sky(&self, x: i32, y: i32, z: i32, reg: &BlockRegistry) -> bool {
        (y.max(0)..self.dims.y as i32).all(|y1| reg.is_translucent(self.block(x, y1, z)))
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.shared.is_dirty()
    }

    #[inline]
    pub fn set_dirty(&self, v: bool) {
        self.shared.set_dirty(v);
    }

    #[inline]
    pub fn is_light_dirty(&self) -> bool {
        self.shared.is_light_dirty()
    }

    #[inline]
    pub fn set_light_dirty(&self, v: bool) {
        self.shared.set_light_dirty(v);
    }

    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.shared.is_fresh()
    }

    /// Ends the fresh state once generator passes and sky seeding have run.
    pub fn mark_generated(&self) {
        self.shared.set_fresh(false);
    }

    pub fn is_visible(&self) -> bool {
        self.shared.is_visible()
    }

    pub fn set_visible(&self, v: bool) {
        self.shared.set_visible(v);
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    /// World-space x of the chunk's minimum corner.
    #[inline]
    pub fn world_x(&self) -> i32 {
        self.coord.world_x(self.dims)
    }

    #[inline]
    pub fn world_z(&self) -> i32 {
        self.coord.world_z(self.dims)
    }

    /// Bounding box centred on the chunk volume.
    pub fn aabb(&self) -> Aabb {
        let half = Vec3::new(
            (self.dims.x / 2) as f32,
            (self.dims.y / 2) as f32,
            (self.dims.z / 2) as f32,
        );
        let center = Vec3::new(
            self.world_x() as f32 + half.x,
            half.y,
            self.world_z() as f32 + half.z,
        );
        Aabb::new(center, half)
    }

    /// Planar distance from `origin` to the chunk's minimum corner.
    pub fn distance_to(&self, origin: Vec3) -> f64 {
        origin.planar_distance(f64::from(self.world_x()), f64::from(self.world_z()))
    }

    /// Installs a freshly built mesh as pending and clears `dirty`.
    /// Ignored while the chunk is fresh.
    pub fn install_mesh(&self, mesh: Box<dyn RenderMesh>) -> bool {
        if self.is_fresh() {
            return false;
        }
        self.shared.begin_mesh();
        self.shared.set_new_mesh(mesh);
        self.set_dirty(false);
        true
    }

    pub fn generate_vbos(&self) {
        self.shared.generate_vbos();
    }

    pub fn update(&self) -> bool {
        self.shared.update()
    }

    pub fn render(&self, ty: RenderType) {
        self.shared.render(ty);
    }

    pub fn dispose(&self) {
        self.shared.dispose();
    }

    /// Raw light write used while seeding a fresh chunk; no dirty tracking.
    pub fn put_light(&mut self, x: i32, y: i32, z: i32, kind: LightKind, v: u8) {
        let arr = match kind {
            LightKind::Sky => &mut self.sunlight,
            LightKind::Block => &mut self.block_light,
        };
        arr.set(x, y, z, v);
    }
}

impl GenTarget for Chunk {
    fn coord(&self) -> ChunkCoord {
        self.coord
    }

    fn dims(&self) -> ChunkDims {
        self.dims
    }

    fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        Chunk::block(self, x as i32, y as i32, z as i32)
    }

    fn put_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks.set(x as i32, y as i32, z as i32, id);
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk at {}", self.coord)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("dims", &self.dims)
            .field("dirty", &self.is_dirty())
            .field("light_dirty", &self.is_light_dirty())
            .field("fresh", &self.is_fresh())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> Chunk {
        Chunk::new(ChunkCoord::new(2, -1), ChunkDims::new(4, 8, 4))
    }

    #[test]
    fn new_chunk_flags() {
        let c = chunk();
        assert!(c.is_dirty());
        assert!(c.is_light_dirty());
        assert!(c.is_fresh());
        assert!(!c.is_disposed());
        assert_eq!(c.to_string(), "Chunk at (2, -1)");
    }

    #[test]
    fn identical_write_leaves_dirty_alone() {
        let mut c = chunk();
        assert!(c.set_block(1, 2, 3, 5));
        c.set_dirty(false);
        assert!(!c.set_block(1, 2, 3, 5));
        assert!(!c.is_dirty());
        assert_eq!(c.block(1, 2, 3), 5);
    }

    #[test]
    fn light_writes_clamp_and_reads_use_sentinels() {
        let mut c = chunk();
        c.set_light(0, 0, 0, LightKind::Block, 200);
        assert_eq!(c.light(0, 0, 0, LightKind::Block), 15);
        assert_eq!(c.light(0, 8, 0, LightKind::Sky), 15);
        assert_eq!(c.light(-1, 0, 0, LightKind::Block), 0);
        assert_eq!(c.block(0, -1, 0), 0);
        assert!(!c.set_light(9, 0, 0, LightKind::Sky, 3));
    }

    #[test]
    fn sky_visibility_stops_at_opaque() {
        let reg = BlockRegistry::builtin();
        let stone = reg.id_by_name("stone").unwrap();
        let leaves = reg.id_by_name("leaves").unwrap();
        let mut c = chunk();
        c.set_block(1, 5, 1, stone);
        c.set_block(2, 5, 2, leaves);
        assert!(!c.can_block_see_the_sky(1, 0, 1, &reg));
        assert!(!c.can_block_see_the_sky(1, 5, 1, &reg));
        assert!(c.can_block_see_the_sky(1, 6, 1, &reg));
        assert!(c.can_block_see_the_sky(2, 0, 2, &reg));
    }

    #[test]
    fn aabb_is_centred_on_volume() {
        let c = chunk();
        let b = c.aabb();
        assert_eq!(b.center, Vec3::new(10.0, 4.0, -2.0));
        assert_eq!(b.extents, Vec3::new(2.0, 4.0, 2.0));
    }

    #[test]
    fn fresh_chunk_ignores_installed_mesh() {
        struct Noop;
        impl RenderMesh for Noop {
            fn generate_vbos(&mut self) {}
            fn is_generated(&self) -> bool {
                true
            }
            fn is_disposed(&self) -> bool {
                false
            }
            fn dispose(&mut self) {}
            fn render(&self, _ty: RenderType) {}
        }
        let c = chunk();
        assert!(!c.install_mesh(Box::new(Noop)));
        assert_eq!(c.shared().phase(), MeshPhase::NoMesh);
        c.mark_generated();
        assert!(c.install_mesh(Box::new(Noop)));
        assert!(!c.is_dirty());
        assert_eq!(c.shared().phase(), MeshPhase::PendingReady);
    }
}
