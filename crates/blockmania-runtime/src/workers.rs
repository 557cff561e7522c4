use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use blockmania_chunk::ChunkHandle;
use blockmania_mesh::{ChunkMesh, ChunkSnapshot, FaceMesher, GpuBackend};
use blockmania_world::ChunkCoord;
use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// One off-thread mesh build. The ticket comes from [`ChunkHandle::begin_mesh`].
pub struct MeshJob {
    pub snapshot: ChunkSnapshot,
    pub handle: ChunkHandle,
    pub ticket: u64,
    pub job_id: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct MeshDone {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub quads: usize,
    /// False when a newer build superseded this one or the chunk was disposed.
    pub installed: bool,
    pub t_mesh_ms: u32,
}

/// Fixed pool of mesh builders fed through a channel.
pub struct MeshWorkers {
    job_tx: Sender<MeshJob>,
    res_rx: Receiver<MeshDone>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: usize,
    next_job: u64,
}

impl MeshWorkers {
    pub fn new(
        workers: usize,
        mesher: FaceMesher,
        backend: Arc<dyn GpuBackend>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<MeshDone>();
        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("mesh-{i}"))
                .build()?,
        );
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let mesher = mesher.clone();
            let backend = Arc::clone(&backend);
            let queued = Arc::clone(&queued);
            let inflight = Arc::clone(&inflight);
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    let done = build_one(&mesher, &backend, job);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    if tx.send(done).is_err() {
                        break;
                    }
                }
            });
        }
        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            workers,
            next_job: 0,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queues a build and returns its job id.
    pub fn submit(&mut self, snapshot: ChunkSnapshot, handle: ChunkHandle) -> u64 {
        self.next_job += 1;
        let job_id = self.next_job;
        let ticket = handle.begin_mesh();
        self.queued.fetch_add(1, Ordering::Relaxed);
        let job = MeshJob {
            snapshot,
            handle,
            ticket,
            job_id,
        };
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            log::warn!("mesh workers gone; job {} dropped", job_id);
        }
        job_id
    }

    /// Jobs waiting and jobs being built.
    pub fn queue_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    pub fn drain_results(&self) -> Vec<MeshDone> {
        self.res_rx.try_iter().collect()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<MeshDone> {
        self.res_rx.recv_timeout(timeout).ok()
    }
}

fn build_one(mesher: &FaceMesher, backend: &Arc<dyn GpuBackend>, job: MeshJob) -> MeshDone {
    let t0 = Instant::now();
    let snap = &job.snapshot;
    let geometry = mesher.build(snap, snap.coord(), snap.dims());
    let quads = geometry.quad_count();
    let mesh = ChunkMesh::new(geometry, Arc::clone(backend));
    let installed = job.handle.install_if_current(job.ticket, Box::new(mesh));
    let t_mesh_ms = t0.elapsed().as_millis().min(u32::MAX as u128) as u32;
    log::trace!(
        "mesh job {} for {} built {} quads ({}ms, installed={})",
        job.job_id,
        snap.coord(),
        quads,
        t_mesh_ms,
        installed
    );
    MeshDone {
        coord: snap.coord(),
        job_id: job.job_id,
        quads,
        installed,
        t_mesh_ms,
    }
}
