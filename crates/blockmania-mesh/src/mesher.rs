use std::sync::Arc;

use blockmania_blocks::{BlockId, BlockRegistry};
use blockmania_chunk::LightKind;
use blockmania_geom::Vec3;
use blockmania_world::{ChunkCoord, ChunkDims};

use crate::face::Face;
use crate::mesh_build::MeshBuild;
use crate::view::VoxelView;

// Keeps unlit faces from going fully black.
const VISUAL_LIGHT_MIN: f32 = 0.12;

/// CPU-side geometry of one chunk, split by render pass.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshGeometry {
    pub opaque: MeshBuild,
    pub translucent: MeshBuild,
}

impl MeshGeometry {
    pub fn quad_count(&self) -> usize {
        self.opaque.quad_count() + self.translucent.quad_count()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }
}

/// Emits one quad per block face that borders a see-through neighbor.
#[derive(Clone)]
pub struct FaceMesher {
    reg: Arc<BlockRegistry>,
}

impl FaceMesher {
    pub fn new(reg: Arc<BlockRegistry>) -> Self {
        Self { reg }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    fn face_visible(&self, here: BlockId, there: BlockId) -> bool {
        let t = self.reg.get(there);
        if t.invisible || t.is_billboard() {
            return true;
        }
        t.translucent && there != here
    }

    fn shade<V: VoxelView + ?Sized>(view: &V, wx: i32, wy: i32, wz: i32, factor: f32) -> [u8; 4] {
        let sky = view.light(wx, wy, wz, LightKind::Sky);
        let blk = view.light(wx, wy, wz, LightKind::Block);
        let level = f32::from(sky.max(blk)) / 15.0;
        let v = (VISUAL_LIGHT_MIN + (1.0 - VISUAL_LIGHT_MIN) * level) * factor;
        let c = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c, c, c, 255]
    }

    pub fn build<V: VoxelView + ?Sized>(
        &self,
        view: &V,
        coord: ChunkCoord,
        dims: ChunkDims,
    ) -> MeshGeometry {
        let mut out = MeshGeometry::default();
        let bx = coord.world_x(dims);
        let bz = coord.world_z(dims);
        for y in 0..dims.y as i32 {
            for z in 0..dims.z as i32 {
                for x in 0..dims.x as i32 {
                    let (wx, wz) = (bx + x, bz + z);
                    let id = view.block(wx, y, wz);
                    let ty = self.reg.get(id);
                    if ty.invisible {
                        continue;
                    }
                    let cell = Vec3::new(wx as f32, y as f32, wz as f32);
                    if ty.is_billboard() {
                        let rgba = Self::shade(view, wx, y, wz, 1.0);
                        out.translucent.add_billboard(cell, rgba);
                        continue;
                    }
                    let bucket = if ty.translucent {
                        &mut out.translucent
                    } else {
                        &mut out.opaque
                    };
                    for face in Face::ALL {
                        let (dx, dy, dz) = face.delta();
                        let (nx, ny, nz) = (wx + dx, y + dy, wz + dz);
                        // Nothing is ever seen from below the world.
                        if ny < 0 {
                            continue;
                        }
                        if !self.face_visible(id, view.block(nx, ny, nz)) {
                            continue;
                        }
                        let rgba = Self::shade(view, nx, ny, nz, face.shade());
                        bucket.add_cube_face(face, cell, rgba);
                    }
                }
            }
        }
        log::trace!(
            target: "mesh",
            "meshed chunk {}: {} opaque / {} translucent quads",
            coord,
            out.opaque.quad_count(),
            out.translucent.quad_count()
        );
        out
    }
}
