//! State shared between the simulation and the render thread.
//!
//! Lifecycle flags are atomics; both mesh slots and the disposed state sit
//! behind one mutex per chunk. A mesh is disposed before its slot is cleared
//! or reassigned, and only while that mutex is held.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use blockmania_world::ChunkCoord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderType {
    Opaque,
    Translucent,
}

/// GPU-facing mesh owned by a chunk's mesh slots.
pub trait RenderMesh: Send {
    /// Uploads vertex data. Calling it again after a successful upload does nothing.
    fn generate_vbos(&mut self);
    fn is_generated(&self) -> bool;
    fn is_disposed(&self) -> bool;
    fn dispose(&mut self);
    fn render(&self, ty: RenderType);
}

/// Observable phase of a chunk's mesh slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshPhase {
    NoMesh,
    /// A pending mesh exists but has not been uploaded.
    PendingBuild,
    /// The pending mesh is uploaded and waits for `update()`.
    PendingReady,
    Active,
    Disposed,
}

enum MeshSlots {
    Live {
        active: Option<Box<dyn RenderMesh>>,
        pending: Option<Box<dyn RenderMesh>>,
    },
    Disposed,
}

pub struct ChunkShared {
    coord: ChunkCoord,
    dirty: AtomicBool,
    light_dirty: AtomicBool,
    fresh: AtomicBool,
    visible: AtomicBool,
    mesh_ticket: AtomicU64,
    slots: Mutex<MeshSlots>,
}

/// Cloneable reference to a chunk's shared state, held by render code.
pub type ChunkHandle = Arc<ChunkShared>;

impl ChunkShared {
    pub(crate) fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            dirty: AtomicBool::new(true),
            light_dirty: AtomicBool::new(true),
            fresh: AtomicBool::new(true),
            visible: AtomicBool::new(true),
            mesh_ticket: AtomicU64::new(0),
            slots: Mutex::new(MeshSlots::Live {
                active: None,
                pending: None,
            }),
        }
    }

    fn slots(&self) -> MutexGuard<'_, MeshSlots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_dirty(&self, v: bool) {
        self.dirty.store(v, Ordering::Release);
    }

    #[inline]
    pub fn is_light_dirty(&self) -> bool {
        self.light_dirty.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_light_dirty(&self, v: bool) {
        self.light_dirty.store(v, Ordering::Release);
    }

    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.fresh.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_fresh(&self, v: bool) {
        self.fresh.store(v, Ordering::Release);
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_visible(&self, v: bool) {
        self.visible.store(v, Ordering::Relaxed);
    }

    pub fn is_disposed(&self) -> bool {
        matches!(*self.slots(), MeshSlots::Disposed)
    }

    pub fn phase(&self) -> MeshPhase {
        match &*self.slots() {
            MeshSlots::Disposed => MeshPhase::Disposed,
            MeshSlots::Live {
                pending: Some(p), ..
            } => {
                if p.is_generated() {
                    MeshPhase::PendingReady
                } else {
                    MeshPhase::PendingBuild
                }
            }
            MeshSlots::Live {
                active: Some(_), ..
            } => MeshPhase::Active,
            MeshSlots::Live { .. } => MeshPhase::NoMesh,
        }
    }

    /// Installs `mesh` as pending, disposing any pending mesh that was never
    /// swapped in. A disposed chunk disposes and drops the new mesh instead.
    pub fn set_new_mesh(&self, mut mesh: Box<dyn RenderMesh>) {
        let mut slots = self.slots();
        match &mut *slots {
            MeshSlots::Disposed => mesh.dispose(),
            MeshSlots::Live { pending, .. } => {
                if let Some(old) = pending.as_mut() {
                    old.dispose();
                }
                *pending = Some(mesh);
            }
        }
    }

    /// Starts a new mesh build and returns its ticket. Builds started earlier
    /// can no longer install their result, and a pending mesh that was never
    /// swapped in is disposed since it no longer matches the chunk.
    pub fn begin_mesh(&self) -> u64 {
        let mut slots = self.slots();
        if let MeshSlots::Live { pending, .. } = &mut *slots {
            if let Some(mut stale) = pending.take() {
                stale.dispose();
            }
        }
        self.mesh_ticket.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Installs `mesh` only if no newer build was started since `ticket`;
    /// otherwise the mesh is disposed. Returns whether it was installed.
    pub fn install_if_current(&self, ticket: u64, mut mesh: Box<dyn RenderMesh>) -> bool {
        let mut slots = self.slots();
        let current = self.mesh_ticket.load(Ordering::Acquire) == ticket;
        match &mut *slots {
            MeshSlots::Live { pending, .. } if current => {
                if let Some(old) = pending.as_mut() {
                    old.dispose();
                }
                *pending = Some(mesh);
                true
            }
            _ => {
                mesh.dispose();
                false
            }
        }
    }

    /// Uploads the pending mesh, if any.
    pub fn generate_vbos(&self) {
        if let MeshSlots::Live {
            pending: Some(p), ..
        } = &mut *self.slots()
        {
            if !p.is_disposed() {
                p.generate_vbos();
            }
        }
    }

    /// Promotes an uploaded pending mesh to active. Returns true if a swap happened.
    pub fn update(&self) -> bool {
        if self.is_dirty() || self.is_fresh() || self.is_light_dirty() {
            return false;
        }
        let mut slots = self.slots();
        let MeshSlots::Live { active, pending } = &mut *slots else {
            return false;
        };
        match pending {
            Some(p) if p.is_generated() && !p.is_disposed() => {}
            _ => return false,
        }
        if let Some(old) = active.as_mut() {
            old.dispose();
        }
        *active = pending.take();
        log::trace!(target: "mesh", "chunk {} swapped in new mesh", self.coord);
        true
    }

    pub fn render(&self, ty: RenderType) {
        if let MeshSlots::Live {
            active: Some(m), ..
        } = &*self.slots()
        {
            m.render(ty);
        }
    }

    /// Disposes both meshes and enters the terminal state. Safe to call twice.
    pub fn dispose(&self) {
        let mut slots = self.slots();
        if let MeshSlots::Live { active, pending } = &mut *slots {
            if let Some(m) = active.as_mut() {
                m.dispose();
            }
            if let Some(m) = pending.as_mut() {
                m.dispose();
            }
            *slots = MeshSlots::Disposed;
            log::debug!("chunk {} disposed", self.coord);
        }
    }
}
