use std::sync::Arc;

use blockmania_chunk::{RenderMesh, RenderType};

use crate::gpu::{BufferId, GpuBackend};
use crate::mesher::MeshGeometry;

/// Built chunk geometry that is uploaded on demand and drawn per render pass.
pub struct ChunkMesh {
    backend: Arc<dyn GpuBackend>,
    geometry: Option<MeshGeometry>,
    opaque: Option<BufferId>,
    translucent: Option<BufferId>,
    quads: usize,
    generated: bool,
    disposed: bool,
}

impl ChunkMesh {
    pub fn new(geometry: MeshGeometry, backend: Arc<dyn GpuBackend>) -> Self {
        Self {
            backend,
            quads: geometry.quad_count(),
            geometry: Some(geometry),
            opaque: None,
            translucent: None,
            generated: false,
            disposed: false,
        }
    }

    pub fn quad_count(&self) -> usize {
        self.quads
    }
}

impl RenderMesh for ChunkMesh {
    fn generate_vbos(&mut self) {
        if self.generated || self.disposed {
            return;
        }
        // CPU copies are no longer needed once on the device.
        if let Some(geom) = self.geometry.take() {
            if !geom.opaque.is_empty() {
                self.opaque = Some(self.backend.upload(&geom.opaque));
            }
            if !geom.translucent.is_empty() {
                self.translucent = Some(self.backend.upload(&geom.translucent));
            }
        }
        self.generated = true;
    }

    fn is_generated(&self) -> bool {
        self.generated
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for id in [self.opaque.take(), self.translucent.take()].into_iter().flatten() {
            self.backend.release(id);
        }
        self.geometry = None;
        self.disposed = true;
    }

    fn render(&self, ty: RenderType) {
        if self.disposed {
            return;
        }
        let id = match ty {
            RenderType::Opaque => self.opaque,
            RenderType::Translucent => self.translucent,
        };
        if let Some(id) = id {
            self.backend.draw(id, ty);
        }
    }
}
