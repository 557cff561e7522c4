use std::sync::Arc;

use super::*;
use blockmania_blocks::BlockRegistry;
use blockmania_chunk::{Chunk, LightKind, MeshPhase, RenderMesh, RenderType};
use blockmania_world::{ChunkCoord, ChunkDims};

fn setup() -> (Arc<BlockRegistry>, Chunk) {
    let reg = Arc::new(BlockRegistry::builtin());
    let chunk = Chunk::new(ChunkCoord::new(1, -1), ChunkDims::new(4, 6, 4));
    (reg, chunk)
}

fn id(reg: &BlockRegistry, name: &str) -> u8 {
    reg.id_by_name(name).unwrap()
}

fn build(reg: &Arc<BlockRegistry>, chunk: &Chunk) -> MeshGeometry {
    FaceMesher::new(reg.clone()).build(chunk, chunk.coord(), chunk.dims())
}

#[test]
fn lone_cube_has_six_faces() {
    let (reg, mut c) = setup();
    c.set_block(1, 2, 1, id(&reg, "stone"));
    let g = build(&reg, &c);
    assert_eq!(g.opaque.quad_count(), 6);
    assert!(g.translucent.is_empty());
    assert_eq!(g.opaque.vertex_count(), 24);
}

#[test]
fn shared_face_between_solids_is_culled() {
    let (reg, mut c) = setup();
    let stone = id(&reg, "stone");
    c.set_block(1, 2, 1, stone);
    c.set_block(2, 2, 1, stone);
    assert_eq!(build(&reg, &c).opaque.quad_count(), 10);
}

#[test]
fn floor_faces_are_skipped() {
    let (reg, mut c) = setup();
    c.set_block(0, 0, 0, id(&reg, "dirt"));
    assert_eq!(build(&reg, &c).opaque.quad_count(), 5);
}

#[test]
fn glass_hides_glass_but_not_stone() {
    let (reg, mut c) = setup();
    let glass = id(&reg, "glass");
    c.set_block(1, 2, 1, glass);
    c.set_block(2, 2, 1, glass);
    c.set_block(1, 3, 1, id(&reg, "stone"));
    let g = build(&reg, &c);
    // Two glass cubes: 10 faces minus the one under the stone.
    assert_eq!(g.translucent.quad_count(), 9);
    // Stone shows all faces, including the one resting on glass.
    assert_eq!(g.opaque.quad_count(), 6);
}

#[test]
fn billboards_are_crossed_double_sided_quads() {
    let (reg, mut c) = setup();
    c.set_block(2, 1, 2, id(&reg, "tall_grass"));
    let g = build(&reg, &c);
    assert_eq!(g.translucent.quad_count(), 4);
    assert!(g.opaque.is_empty());
}

#[test]
fn face_colour_follows_neighbor_light() {
    let (reg, mut c) = setup();
    c.set_block(1, 2, 1, id(&reg, "stone"));
    c.set_light(1, 3, 1, LightKind::Sky, 15);
    let g = build(&reg, &c);
    // The top face is emitted first and sampled from the lit cell above.
    let top = g.opaque.col[0];
    let bottom = g.opaque.col[4 * 4];
    assert_eq!(top, 255);
    assert!(bottom < top);
}

#[test]
fn snapshot_matches_live_chunk() {
    let (reg, mut c) = setup();
    c.set_block(0, 1, 3, id(&reg, "stone"));
    c.set_block(3, 5, 0, id(&reg, "leaves"));
    c.set_light(2, 2, 2, LightKind::Block, 9);
    let snap = ChunkSnapshot::capture(&c, c.coord(), c.dims());
    let (bx, bz) = (c.world_x(), c.world_z());
    for y in -1..7 {
        for z in -1..5 {
            for x in -1..5 {
                let (wx, wz) = (bx + x, bz + z);
                assert_eq!(snap.block(wx, y, wz), VoxelView::block(&c, wx, y, wz));
                for kind in LightKind::ALL {
                    assert_eq!(snap.light(wx, y, wz, kind), VoxelView::light(&c, wx, y, wz, kind));
                }
            }
        }
    }
    assert_eq!(build(&reg, &c), FaceMesher::new(reg.clone()).build(&snap, c.coord(), c.dims()));
}

#[test]
fn chunk_mesh_uploads_once_and_releases_on_dispose() {
    let (reg, mut c) = setup();
    c.set_block(1, 2, 1, id(&reg, "stone"));
    c.set_block(2, 2, 2, id(&reg, "tall_grass"));
    let backend = Arc::new(HeadlessBackend::new());
    let mut mesh = ChunkMesh::new(build(&reg, &c), backend.clone());
    assert_eq!(mesh.quad_count(), 10);
    assert!(!mesh.is_generated());
    mesh.generate_vbos();
    mesh.generate_vbos();
    assert_eq!(backend.stats().uploads, 2);
    mesh.render(RenderType::Opaque);
    mesh.render(RenderType::Translucent);
    assert_eq!(backend.stats().draws, 2);
    mesh.dispose();
    mesh.dispose();
    assert_eq!(backend.stats().live_buffers(), 0);
    mesh.render(RenderType::Opaque);
    assert_eq!(backend.stats().draws, 2);
}

#[test]
fn empty_bucket_is_never_uploaded() {
    let (reg, mut c) = setup();
    c.set_block(1, 2, 1, id(&reg, "stone"));
    let backend = Arc::new(HeadlessBackend::new());
    let mut mesh = ChunkMesh::new(build(&reg, &c), backend.clone());
    mesh.generate_vbos();
    mesh.render(RenderType::Translucent);
    let s = backend.stats();
    assert_eq!(s.uploads, 1);
    assert_eq!(s.draws, 0);
    assert_eq!(s.quads_uploaded, 6);
}

#[test]
fn swap_through_chunk_slots_releases_old_buffers() {
    let (reg, mut c) = setup();
    c.set_block(1, 2, 1, id(&reg, "stone"));
    c.mark_generated();
    c.set_light_dirty(false);
    let backend = Arc::new(HeadlessBackend::new());
    for _ in 0..3 {
        let mesh = ChunkMesh::new(build(&reg, &c), backend.clone());
        assert!(c.install_mesh(Box::new(mesh)));
        c.generate_vbos();
        assert!(c.update());
    }
    assert_eq!(c.shared().phase(), MeshPhase::Active);
    assert_eq!(backend.stats().live_buffers(), 1);
    c.dispose();
    assert_eq!(backend.stats().live_buffers(), 0);
}
