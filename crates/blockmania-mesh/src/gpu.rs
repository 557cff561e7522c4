use std::sync::atomic::{AtomicU64, Ordering};

use blockmania_chunk::RenderType;

use crate::mesh_build::MeshBuild;

/// Opaque id of an uploaded vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Minimal device interface a [`crate::ChunkMesh`] talks to.
pub trait GpuBackend: Send + Sync {
    fn upload(&self, build: &MeshBuild) -> BufferId;
    fn release(&self, id: BufferId);
    fn draw(&self, id: BufferId, ty: RenderType);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GpuStats {
    pub uploads: u64,
    pub releases: u64,
    pub draws: u64,
    pub quads_uploaded: u64,
}

impl GpuStats {
    /// Buffers uploaded and not yet released.
    pub fn live_buffers(&self) -> u64 {
        self.uploads.saturating_sub(self.releases)
    }
}

/// Backend without a device: hands out ids and counts calls.
#[derive(Default)]
pub struct HeadlessBackend {
    next_id: AtomicU64,
    uploads: AtomicU64,
    releases: AtomicU64,
    draws: AtomicU64,
    quads: AtomicU64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> GpuStats {
        GpuStats {
            uploads: self.uploads.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            draws: self.draws.load(Ordering::Relaxed),
            quads_uploaded: self.quads.load(Ordering::Relaxed),
        }
    }
}

impl GpuBackend for HeadlessBackend {
    fn upload(&self, build: &MeshBuild) -> BufferId {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        self.quads
            .fetch_add(build.quad_count() as u64, Ordering::Relaxed);
        BufferId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn release(&self, _id: BufferId) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    fn draw(&self, _id: BufferId, _ty: RenderType) {
        self.draws.fetch_add(1, Ordering::Relaxed);
    }
}
