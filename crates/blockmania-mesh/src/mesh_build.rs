use blockmania_geom::Vec3;

use crate::face::Face;

/// Interleaved-free vertex streams for one render bucket.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but keeps their capacity.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
    }

    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a quad `a, b, c, d`, reordering it so it winds toward `n`.
    pub fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, n: Vec3, rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        let mut vs = [a, d, c, b];
        let mut uvs = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let e1 = vs[1] - vs[0];
        let e2 = vs[2] - vs[0];
        let cross = Vec3::new(
            e1.y * e2.z - e1.z * e2.y,
            e1.z * e2.x - e1.x * e2.z,
            e1.x * e2.y - e1.y * e2.x,
        );
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Unit square on `face` of the cell whose minimum corner is `cell`.
    pub fn add_cube_face(&mut self, face: Face, cell: Vec3, rgba: [u8; 4]) {
        let Vec3 { x, y, z } = cell;
        let (a, b, c, d) = match face {
            Face::PosY => (
                Vec3::new(x, y + 1.0, z),
                Vec3::new(x + 1.0, y + 1.0, z),
                Vec3::new(x + 1.0, y + 1.0, z + 1.0),
                Vec3::new(x, y + 1.0, z + 1.0),
            ),
            Face::NegY => (
                Vec3::new(x, y, z + 1.0),
                Vec3::new(x + 1.0, y, z + 1.0),
                Vec3::new(x + 1.0, y, z),
                Vec3::new(x, y, z),
            ),
            Face::PosX => (
                Vec3::new(x + 1.0, y + 1.0, z + 1.0),
                Vec3::new(x + 1.0, y + 1.0, z),
                Vec3::new(x + 1.0, y, z),
                Vec3::new(x + 1.0, y, z + 1.0),
            ),
            Face::NegX => (
                Vec3::new(x, y + 1.0, z),
                Vec3::new(x, y + 1.0, z + 1.0),
                Vec3::new(x, y, z + 1.0),
                Vec3::new(x, y, z),
            ),
            Face::PosZ => (
                Vec3::new(x + 1.0, y + 1.0, z + 1.0),
                Vec3::new(x, y + 1.0, z + 1.0),
                Vec3::new(x, y, z + 1.0),
                Vec3::new(x + 1.0, y, z + 1.0),
            ),
            Face::NegZ => (
                Vec3::new(x, y + 1.0, z),
                Vec3::new(x + 1.0, y + 1.0, z),
                Vec3::new(x + 1.0, y, z),
                Vec3::new(x, y, z),
            ),
        };
        self.add_quad(a, b, c, d, face.normal(), rgba);
    }

    /// Two crossed vertical planes through the cell, each emitted for both sides.
    pub fn add_billboard(&mut self, cell: Vec3, rgba: [u8; 4]) {
        let Vec3 { x, y, z } = cell;
        let planes = [
            (Vec3::new(x, y, z), Vec3::new(x + 1.0, y, z + 1.0)),
            (Vec3::new(x + 1.0, y, z), Vec3::new(x, y, z + 1.0)),
        ];
        for (p0, p1) in planes {
            let a = Vec3::new(p0.x, y + 1.0, p0.z);
            let b = Vec3::new(p1.x, y + 1.0, p1.z);
            let c = p1;
            let d = p0;
            let n = Vec3::new(p1.z - p0.z, 0.0, p0.x - p1.x) / std::f32::consts::SQRT_2;
            self.add_quad(a, b, c, d, n, rgba);
            self.add_quad(a, b, c, d, n * -1.0, rgba);
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
}
