use blockmania_chunk::Chunk;
use blockmania_geom::Vec3;
use blockmania_world::ChunkCoord;
use hashbrown::HashMap;

/// Generational handle into a [`ChunkStore`]. Stale after the chunk is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkId {
    index: u32,
    generation: u32,
}

impl ChunkId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

struct Slot {
    generation: u32,
    chunk: Option<Chunk>,
}

/// Arena of resident chunks plus a coordinate lookup. Holds at most one chunk per coordinate.
#[derive(Default)]
pub struct ChunkStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_coord: HashMap<ChunkCoord, ChunkId>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `chunk` under its own coordinate. A chunk already resident at that
    /// coordinate is disposed and its handle invalidated.
    pub fn insert(&mut self, chunk: Chunk) -> ChunkId {
        let coord = chunk.coord();
        if let Some(old) = self.remove_at(coord) {
            log::debug!("{} replaced in store", old);
            old.dispose();
        }
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.chunk = Some(chunk);
                ChunkId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    chunk: Some(chunk),
                });
                ChunkId {
                    index,
                    generation: 0,
                }
            }
        };
        self.by_coord.insert(coord, id);
        id
    }

    #[inline]
    pub fn id_of(&self, coord: ChunkCoord) -> Option<ChunkId> {
        self.by_coord.get(&coord).copied()
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.chunk.as_ref()
    }

    pub fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.chunk.as_mut()
    }

    pub fn get_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.get(self.id_of(coord)?)
    }

    pub fn get_at_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        let id = self.id_of(coord)?;
        self.get_mut(id)
    }

    /// Takes the chunk out of the store. The caller decides whether to persist
    /// and dispose it.
    pub fn remove(&mut self, id: ChunkId) -> Option<Chunk> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let chunk = slot.chunk.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.by_coord.remove(&chunk.coord());
        Some(chunk)
    }

    pub fn remove_at(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let id = self.id_of(coord)?;
        self.remove(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.chunk.as_ref().map(|c| {
                (
                    ChunkId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    c,
                )
            })
        })
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.by_coord.keys().copied()
    }

    /// Resident chunks, nearest first by planar distance from `origin` to each chunk corner.
    pub fn by_distance(&self, origin: Vec3) -> Vec<&Chunk> {
        let mut out: Vec<(f64, &Chunk)> = self
            .iter()
            .map(|(_, c)| (c.distance_to(origin), c))
            .collect();
        out.sort_by(|a, b| a.0.total_cmp(&b.0));
        out.into_iter().map(|(_, c)| c).collect()
    }
}
