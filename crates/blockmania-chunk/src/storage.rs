//! Dense per-cell arrays backing a chunk.

use blockmania_world::ChunkDims;

/// Linear index for `(x, y, z)`, or `None` when outside `dims`.
#[inline]
pub fn linear_index(dims: ChunkDims, x: i32, y: i32, z: i32) -> Option<usize> {
    if !dims.contains(x, y, z) {
        return None;
    }
    let (x, y, z) = (x as usize, y as usize, z as usize);
    Some((y * dims.z + z) * dims.x + x)
}

/// One byte per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockArray {
    dims: ChunkDims,
    data: Vec<u8>,
}

impl BlockArray {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            data: vec![0; dims.volume()],
        }
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<u8> {
        linear_index(self.dims, x, y, z).map(|i| self.data[i])
    }

    /// Writes `v` and returns the previous value; `None` if out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, v: u8) -> Option<u8> {
        let i = linear_index(self.dims, x, y, z)?;
        Some(std::mem::replace(&mut self.data[i], v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    pub fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().copied()
    }
}

/// Two 4-bit values per byte: even cells in the low nibble, odd cells in the high nibble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NibbleArray {
    dims: ChunkDims,
    data: Vec<u8>,
}

impl NibbleArray {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            data: vec![0; Self::packed_len_for(dims)],
        }
    }

    #[inline]
    pub fn packed_len_for(dims: ChunkDims) -> usize {
        dims.volume().div_ceil(2)
    }

    #[inline]
    pub fn packed_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    fn nibble(&self, i: usize) -> u8 {
        let b = self.data[i >> 1];
        if i & 1 == 0 { b & 0x0F } else { b >> 4 }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<u8> {
        linear_index(self.dims, x, y, z).map(|i| self.nibble(i))
    }

    /// Stores `v` (clamped to 15) and returns the previous value; `None` if out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, v: u8) -> Option<u8> {
        let i = linear_index(self.dims, x, y, z)?;
        let old = self.nibble(i);
        let v = v.min(15);
        let b = &mut self.data[i >> 1];
        *b = if i & 1 == 0 {
            (*b & 0xF0) | v
        } else {
            (*b & 0x0F) | (v << 4)
        };
        Some(old)
    }

    pub fn fill(&mut self, v: u8) {
        let v = v.min(15);
        self.data.fill(v | (v << 4));
    }

    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    pub fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_volume_rounds_packed_size_up() {
        let n = NibbleArray::new(ChunkDims::new(3, 3, 3));
        assert_eq!(n.packed_len(), 14);
    }

    #[test]
    fn neighbours_in_same_byte_do_not_clobber() {
        let mut n = NibbleArray::new(ChunkDims::new(2, 1, 1));
        n.set(0, 0, 0, 7);
        n.set(1, 0, 0, 12);
        assert_eq!(n.get(0, 0, 0), Some(7));
        assert_eq!(n.get(1, 0, 0), Some(12));
        assert_eq!(n.raw(), &[0xC7]);
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut b = BlockArray::new(ChunkDims::new(2, 2, 2));
        assert_eq!(b.get(-1, 0, 0), None);
        assert_eq!(b.set(0, 2, 0, 5), None);
        assert!(b.iter().all(|v| v == 0));
    }
}
