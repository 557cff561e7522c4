use std::io;
use std::sync::Arc;
use std::time::Instant;

use blockmania_blocks::{BlockId, BlockRegistry};
use blockmania_chunk::{Chunk, ChunkHandle, LightKind, NEIGHBOR_OFFSETS, boundary_neighbors};
use blockmania_geom::Vec3;
use blockmania_io::ChunkIo;
use blockmania_lighting::{self as lighting, LightVolume};
use blockmania_mesh::{ChunkMesh, ChunkSnapshot, FaceMesher, GpuBackend, VoxelView};
use blockmania_world::{ChunkCoord, ChunkDims, GeneratorSet, WorldConfig, WorldPos};

use crate::store::{ChunkId, ChunkStore};
use crate::workers::{MeshDone, MeshWorkers};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub created: u64,
    pub loaded: u64,
    pub generated: u64,
    pub relit: u64,
    pub meshed: u64,
    pub mesh_jobs: u64,
    pub saved: u64,
    pub unloaded: u64,
    pub load_errors: u64,
}

/// Owns every resident chunk and routes world-coordinate reads and writes to them.
pub struct World {
    config: WorldConfig,
    reg: Arc<BlockRegistry>,
    generators: GeneratorSet,
    store: ChunkStore,
    io: Option<ChunkIo>,
    origin: Vec3,
    backend: Arc<dyn GpuBackend>,
    mesher: FaceMesher,
    workers: Option<MeshWorkers>,
    stats: WorldStats,
}

impl World {
    pub fn new(config: WorldConfig, reg: Arc<BlockRegistry>, backend: Arc<dyn GpuBackend>) -> Self {
        let generators = GeneratorSet::standard(config.seed, &config.terrain, &reg);
        let io = config.save_dir.as_ref().map(|dir| ChunkIo::new(dir.clone()));
        let mesher = FaceMesher::new(Arc::clone(&reg));
        Self {
            config,
            reg,
            generators,
            store: ChunkStore::new(),
            io,
            origin: Vec3::ZERO,
            backend,
            mesher,
            workers: None,
            stats: WorldStats::default(),
        }
    }

    pub fn with_generators(mut self, generators: GeneratorSet) -> Self {
        self.generators = generators;
        self
    }

    /// Builds meshes on `workers` instead of the calling thread.
    pub fn with_mesh_workers(mut self, workers: MeshWorkers) -> Self {
        self.workers = Some(workers);
        self
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.config.chunk
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.reg
    }

    pub fn mesher(&self) -> &FaceMesher {
        &self.mesher
    }

    pub fn backend(&self) -> &Arc<dyn GpuBackend> {
        &self.backend
    }

    pub fn mesh_workers(&self) -> Option<&MeshWorkers> {
        self.workers.as_ref()
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    #[inline]
    pub fn rendering_origin(&self) -> Vec3 {
        self.origin
    }

    pub fn set_rendering_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn resident_count(&self) -> usize {
        self.store.len()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.get_at(coord)
    }

    pub fn chunk_by_id(&self, id: ChunkId) -> Option<&Chunk> {
        self.store.get(id)
    }

    /// Returns the resident chunk at `coord`, loading it from disk or creating it fresh.
    pub fn load_or_create_chunk(&mut self, coord: ChunkCoord) -> ChunkId {
        if let Some(id) = self.store.id_of(coord) {
            return id;
        }
        let dims = self.dims();
        let loaded = match &self.io {
            Some(files) => match files.load(coord, dims) {
                Ok(found) => found,
                Err(e) => {
                    log::warn!("could not load chunk {}: {}; starting fresh", coord, e);
                    self.stats.load_errors += 1;
                    None
                }
            },
            None => None,
        };
        let chunk = match loaded {
            Some(chunk) => {
                self.stats.loaded += 1;
                chunk
            }
            None => {
                self.stats.created += 1;
                Chunk::new(coord, dims)
            }
        };
        self.store.insert(chunk)
    }

    /// Ids of the 8 neighbors in [`NEIGHBOR_OFFSETS`] order.
    pub fn load_or_create_neighbors(&mut self, coord: ChunkCoord) -> [ChunkId; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dz)| self.load_or_create_chunk(coord.offset(dx, dz)))
    }

    /// Runs the generator passes and seeds sky light. Returns false when the chunk was not fresh.
    pub fn generate(&mut self, coord: ChunkCoord) -> bool {
        let id = self.load_or_create_chunk(coord);
        let Some(chunk) = self.store.get_mut(id) else {
            return false;
        };
        if !chunk.is_fresh() {
            return false;
        }
        let t0 = Instant::now();
        self.generators.run_all(chunk);
        lighting::generate_sunlight(chunk, &self.reg);
        chunk.mark_generated();
        log::trace!(
            "{} generated ({:.2}ms)",
            chunk,
            t0.elapsed().as_secs_f64() * 1000.0
        );
        self.stats.generated += 1;
        true
    }

    /// One driver step for a chunk: generate it and its neighbors, relight, remesh.
    /// Returns true when any of those steps did work.
    pub fn process_chunk(&mut self, coord: ChunkCoord) -> bool {
        let mut worked = self.generate(coord);
        for (dx, dz) in NEIGHBOR_OFFSETS {
            worked |= self.generate(coord.offset(dx, dz));
        }
        let Some(chunk) = self.store.get_at(coord) else {
            return worked;
        };
        if chunk.is_light_dirty() {
            worked |= self.update_light(coord);
        }
        let Some(chunk) = self.store.get_at(coord) else {
            return worked;
        };
        if chunk.is_dirty() && !chunk.is_light_dirty() && !chunk.is_fresh() {
            worked |= self.generate_mesh(coord);
        }
        worked
    }

    /// Re-spreads the chunk's light into the world and clears `light_dirty`. No-op while fresh.
    pub fn update_light(&mut self, coord: ChunkCoord) -> bool {
        match self.store.get_at(coord) {
            Some(chunk) if !chunk.is_fresh() => {}
            _ => return false,
        }
        let reg = Arc::clone(&self.reg);
        let dims = self.dims();
        let t0 = Instant::now();
        lighting::relight_chunk(self, &reg, coord, dims);
        if let Some(chunk) = self.store.get_at(coord) {
            chunk.set_light_dirty(false);
        }
        log::trace!(
            "light for {} updated ({:.2}ms)",
            coord,
            t0.elapsed().as_secs_f64() * 1000.0
        );
        self.stats.relit += 1;
        true
    }

    /// Builds a mesh from the current world state and installs it as pending.
    ///
    /// With mesh workers attached the build runs off-thread from a snapshot and
    /// `dirty` is cleared when the job is queued.
    pub fn generate_mesh(&mut self, coord: ChunkCoord) -> bool {
        let dims = self.dims();
        let handle = match self.store.get_at(coord) {
            Some(chunk) if !chunk.is_fresh() && !chunk.is_disposed() => chunk.handle(),
            _ => return false,
        };
        if self.workers.is_some() {
            let snapshot = ChunkSnapshot::capture(&*self, coord, dims);
            handle.set_dirty(false);
            if let Some(workers) = self.workers.as_mut() {
                workers.submit(snapshot, handle);
            }
            self.stats.mesh_jobs += 1;
            return true;
        }
        let geometry = self.mesher.build(&*self, coord, dims);
        let mesh = ChunkMesh::new(geometry, Arc::clone(&self.backend));
        let installed = self
            .store
            .get_at(coord)
            .is_some_and(|chunk| chunk.install_mesh(Box::new(mesh)));
        if installed {
            self.stats.meshed += 1;
        }
        installed
    }

    /// Collects finished off-thread builds.
    pub fn drain_mesh_results(&mut self) -> Vec<MeshDone> {
        let Some(workers) = self.workers.as_ref() else {
            return Vec::new();
        };
        let done = workers.drain_results();
        self.stats.meshed += done.iter().filter(|d| d.installed).count() as u64;
        done
    }

    /// Marks the neighbors sharing a boundary with local column `(x, z)` of `coord` dirty.
    pub fn mark_neighbors_dirty(&mut self, coord: ChunkCoord, x: usize, z: usize) {
        for i in boundary_neighbors(x, z, self.dims()) {
            let (dx, dz) = NEIGHBOR_OFFSETS[i];
            let id = self.load_or_create_chunk(coord.offset(dx, dz));
            if let Some(chunk) = self.store.get(id) {
                chunk.set_dirty(true);
            }
        }
    }

    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        self.block_at(WorldPos::new(wx, wy, wz))
    }

    /// Places a block and brings both light channels up to date around it.
    /// Returns false when the position is outside the world or the block was already there.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId) -> bool {
        let p = WorldPos::new(wx, wy, wz);
        let Some((coord, x, y, z)) = p.split(self.dims()) else {
            return false;
        };
        self.generate(coord);
        let Some(chunk) = self.store.get_at_mut(coord) else {
            return false;
        };
        let (lx, ly, lz) = (x as i32, y as i32, z as i32);
        let old = chunk.block(lx, ly, lz);
        if !chunk.set_block(lx, ly, lz, id) {
            return false;
        }
        self.mark_neighbors_dirty(coord, x, z);

        let reg = Arc::clone(&self.reg);
        lighting::refresh_sunlight_column(self, &reg, wx, wz, true, true);
        self.refresh_block_light(&reg, p, old, id);
        log::debug!("block {} -> {} at ({}, {}, {})", old, id, wx, wy, wz);
        true
    }

    fn refresh_block_light(&mut self, reg: &BlockRegistry, p: WorldPos, old: BlockId, new: BlockId) {
        let current = self.light_at(p, LightKind::Block);
        if current > 0 && (reg.luminance(old) > 0 || !reg.is_translucent(new)) {
            lighting::unspread_light(self, reg, p, LightKind::Block, current);
        }
        let emitted = reg.luminance(new);
        if emitted > 0 {
            lighting::spread_light(self, reg, p, LightKind::Block, emitted);
        } else if reg.is_translucent(new) {
            lighting::refresh_light_at(self, reg, p, LightKind::Block);
            let v = self.light_at(p, LightKind::Block);
            if v > 0 {
                lighting::spread_light(self, reg, p, LightKind::Block, v);
            }
        }
    }

    pub fn get_light(&self, wx: i32, wy: i32, wz: i32, kind: LightKind) -> u8 {
        self.light_at(WorldPos::new(wx, wy, wz), kind)
    }

    /// Writes one light value. Dropped for fresh or non-resident chunks.
    pub fn set_light(&mut self, wx: i32, wy: i32, wz: i32, kind: LightKind, v: u8) -> bool {
        self.write_light(WorldPos::new(wx, wy, wz), kind, v)
    }

    pub fn spread_light(&mut self, wx: i32, wy: i32, wz: i32, kind: LightKind, value: u8) {
        let reg = Arc::clone(&self.reg);
        lighting::spread_light(self, &reg, WorldPos::new(wx, wy, wz), kind, value);
    }

    pub fn unspread_light(&mut self, wx: i32, wy: i32, wz: i32, kind: LightKind, value: u8) {
        let reg = Arc::clone(&self.reg);
        lighting::unspread_light(self, &reg, WorldPos::new(wx, wy, wz), kind, value);
    }

    /// Copy of one chunk plus its border, for meshing elsewhere.
    pub fn snapshot(&self, coord: ChunkCoord) -> Option<ChunkSnapshot> {
        self.store.get_at(coord)?;
        Some(ChunkSnapshot::capture(self, coord, self.dims()))
    }

    /// Resident coordinates, nearest to the rendering origin first.
    pub fn chunks_by_distance(&self) -> Vec<ChunkCoord> {
        self.store
            .by_distance(self.origin)
            .into_iter()
            .map(Chunk::coord)
            .collect()
    }

    /// Handles of generated chunks, nearest first, for the render thread.
    pub fn render_handles(&self) -> Vec<ChunkHandle> {
        self.store
            .by_distance(self.origin)
            .into_iter()
            .filter(|c| !c.is_fresh())
            .map(Chunk::handle)
            .collect()
    }

    /// Sets each chunk's `visible` flag by planar distance from the rendering origin.
    pub fn update_visibility(&self, max_distance: f64) {
        for (_, chunk) in self.store.iter() {
            chunk.set_visible(chunk.distance_to(self.origin) <= max_distance);
        }
    }

    /// Saves the chunk when a save directory is configured, then disposes it.
    /// A failed save leaves the chunk resident.
    pub fn unload(&mut self, coord: ChunkCoord) -> io::Result<bool> {
        let Some(chunk) = self.store.get_at(coord) else {
            return Ok(false);
        };
        let saved = self.persist(chunk)?;
        let Some(chunk) = self.store.remove_at(coord) else {
            return Ok(false);
        };
        chunk.dispose();
        self.stats.unloaded += 1;
        if saved {
            self.stats.saved += 1;
        }
        Ok(true)
    }

    /// Unloads every chunk further than `radius` chunks from `center` on either axis.
    pub fn unload_outside(&mut self, center: ChunkCoord, radius: i32) -> io::Result<usize> {
        let far: Vec<ChunkCoord> = self
            .store
            .coords()
            .filter(|c| (c.x - center.x).abs() > radius || (c.z - center.z).abs() > radius)
            .collect();
        for coord in &far {
            self.unload(*coord)?;
        }
        Ok(far.len())
    }

    /// Writes every generated chunk. Returns how many were saved.
    pub fn save_all(&mut self) -> io::Result<usize> {
        let mut n = 0;
        for (_, chunk) in self.store.iter() {
            if self.persist(chunk)? {
                n += 1;
            }
        }
        self.stats.saved += n as u64;
        Ok(n)
    }

    fn persist(&self, chunk: &Chunk) -> io::Result<bool> {
        match &self.io {
            Some(files) if !chunk.is_fresh() => files.save(chunk).map(|_| true),
            _ => Ok(false),
        }
    }

    fn block_at(&self, p: WorldPos) -> BlockId {
        match p.split(self.dims()) {
            Some((coord, x, y, z)) => self
                .store
                .get_at(coord)
                .map_or(0, |c| c.block(x as i32, y as i32, z as i32)),
            None => 0,
        }
    }

    // Above the world reads as the sentinel; below it and unloaded chunks read as dark.
    fn light_at(&self, p: WorldPos, kind: LightKind) -> u8 {
        let dims = self.dims();
        if p.y >= dims.y as i32 {
            return kind.sentinel();
        }
        match p.split(dims) {
            Some((coord, x, y, z)) => self
                .store
                .get_at(coord)
                .map_or(0, |c| c.light(x as i32, y as i32, z as i32, kind)),
            None => 0,
        }
    }

    fn write_light(&mut self, p: WorldPos, kind: LightKind, v: u8) -> bool {
        let Some((coord, x, y, z)) = p.split(self.dims()) else {
            return false;
        };
        let Some(chunk) = self.store.get_at_mut(coord) else {
            return false;
        };
        if chunk.is_fresh() || !chunk.set_light(x as i32, y as i32, z as i32, kind, v) {
            return false;
        }
        self.mark_neighbors_dirty(coord, x, z);
        true
    }
}

impl LightVolume for World {
    fn height(&self) -> i32 {
        self.config.chunk.y as i32
    }

    fn light(&self, p: WorldPos, kind: LightKind) -> u8 {
        self.light_at(p, kind)
    }

    fn set_light(&mut self, p: WorldPos, kind: LightKind, v: u8) {
        self.write_light(p, kind, v);
    }

    fn block(&self, p: WorldPos) -> BlockId {
        self.block_at(p)
    }

    fn accepts_light(&self, p: WorldPos) -> bool {
        match p.split(self.dims()) {
            Some((coord, ..)) => self.store.get_at(coord).is_some_and(|c| !c.is_fresh()),
            None => false,
        }
    }
}

impl VoxelView for World {
    fn block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        self.block_at(WorldPos::new(wx, wy, wz))
    }

    fn light(&self, wx: i32, wy: i32, wz: i32, kind: LightKind) -> u8 {
        self.light_at(WorldPos::new(wx, wy, wz), kind)
    }
}
