//! Byte layout for persisting a chunk.
//!
//! Order: grid x (i32 BE), grid z (i32 BE), flags (bit 0 = light dirty),
//! one byte per block, packed sky light, packed block light.

use std::io::{self, Read, Write};

use blockmania_world::{ChunkCoord, ChunkDims};

use crate::Chunk;

const FLAG_LIGHT_DIRTY: u8 = 1 << 0;

/// Serialized size of a chunk with the given dimensions.
pub fn encoded_len(dims: ChunkDims) -> usize {
    4 + 4 + 1 + dims.volume() + 2 * dims.volume().div_ceil(2)
}

impl Chunk {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.header())?;
        out.write_all(self.blocks.raw())?;
        out.write_all(self.sunlight.raw())?;
        out.write_all(self.block_light.raw())?;
        Ok(())
    }

    /// Reads a chunk written by [`Chunk::write_to`]. The result is not fresh
    /// and is dirty so it gets meshed again.
    pub fn read_from<R: Read>(input: &mut R, dims: ChunkDims) -> io::Result<Chunk> {
        let mut word = [0u8; 4];
        input.read_exact(&mut word)?;
        let x = i32::from_be_bytes(word);
        input.read_exact(&mut word)?;
        let z = i32::from_be_bytes(word);
        let mut flags = [0u8; 1];
        input.read_exact(&mut flags)?;

        let mut chunk = Chunk::new(ChunkCoord::new(x, z), dims);
        input.read_exact(chunk.blocks.raw_mut())?;
        input.read_exact(chunk.sunlight.raw_mut())?;
        input.read_exact(chunk.block_light.raw_mut())?;

        chunk.set_light_dirty(flags[0] & FLAG_LIGHT_DIRTY != 0);
        chunk.shared.set_fresh(false);
        chunk.set_dirty(true);
        Ok(chunk)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(encoded_len(self.dims));
        out.extend_from_slice(&self.header());
        out.extend_from_slice(self.blocks.raw());
        out.extend_from_slice(self.sunlight.raw());
        out.extend_from_slice(self.block_light.raw());
        out
    }

    /// Chunk x and z as big-endian i32, then the flags byte.
    fn header(&self) -> [u8; 9] {
        let mut header = [0u8; 9];
        header[0..4].copy_from_slice(&self.coord.x.to_be_bytes());
        header[4..8].copy_from_slice(&self.coord.z.to_be_bytes());
        if self.is_light_dirty() {
            header[8] |= FLAG_LIGHT_DIRTY;
        }
        header
    }

    pub fn from_bytes(bytes: &[u8], dims: ChunkDims) -> io::Result<Chunk> {
        let mut cursor = bytes;
        Self::read_from(&mut cursor, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LightKind;

    const D: ChunkDims = ChunkDims::new(3, 5, 3);

    #[test]
    fn header_is_big_endian() {
        let c = Chunk::new(ChunkCoord::new(1, -2), D);
        let bytes = c.to_bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..8], &[0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(bytes[8], FLAG_LIGHT_DIRTY);
        assert_eq!(bytes.len(), encoded_len(D));
    }

    #[test]
    fn read_clears_fresh_and_sets_dirty() {
        let mut c = Chunk::new(ChunkCoord::new(4, 4), D);
        c.set_block(1, 1, 1, 9);
        c.set_light(2, 4, 0, LightKind::Sky, 13);
        c.set_light_dirty(false);
        let back = Chunk::from_bytes(&c.to_bytes(), D).unwrap();
        assert!(!back.is_fresh());
        assert!(back.is_dirty());
        assert!(!back.is_light_dirty());
        assert_eq!(back.block(1, 1, 1), 9);
        assert_eq!(back.light(2, 4, 0, LightKind::Sky), 13);
    }

    #[test]
    fn to_bytes_matches_streamed_write() {
        let mut c = Chunk::new(ChunkCoord::new(-7, 3), D);
        c.set_block(2, 3, 1, 4);
        c.set_light(0, 0, 2, LightKind::Block, 9);
        c.set_light_dirty(false);
        let mut streamed = Vec::new();
        c.write_to(&mut streamed).unwrap();
        assert_eq!(c.to_bytes(), streamed);
        assert_eq!(streamed[8], 0);
    }

    #[test]
    fn truncated_input_is_unexpected_eof() {
        let c = Chunk::new(ChunkCoord::new(0, 0), D);
        let bytes = c.to_bytes();
        let err = Chunk::from_bytes(&bytes[..bytes.len() - 1], D).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
