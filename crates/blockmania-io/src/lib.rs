//! Chunk files on disk.
//!
//! A chunk at grid `(x, z)` lives at `<root>/{x36}/{z36}/bc_{x36}.{z36}`, where
//! `x36` is the signed base-36 rendering of the coordinate.
#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use blockmania_chunk::Chunk;
use blockmania_world::{ChunkCoord, ChunkDims};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase base-36 with a leading `-` for negatives.
pub fn to_base36(v: i32) -> String {
    let mut n = i64::from(v).unsigned_abs();
    if n == 0 {
        return String::from("0");
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    if v < 0 {
        out.push(b'-');
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Directory of a chunk relative to the save root.
pub fn chunk_dir(coord: ChunkCoord) -> PathBuf {
    Path::new(&to_base36(coord.x)).join(to_base36(coord.z))
}

pub fn chunk_file_name(coord: ChunkCoord) -> String {
    format!("bc_{}.{}", to_base36(coord.x), to_base36(coord.z))
}

#[derive(Clone, Debug)]
pub struct ChunkIo {
    root: PathBuf,
}

impl ChunkIo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, coord: ChunkCoord) -> PathBuf {
        self.root
            .join(chunk_dir(coord))
            .join(chunk_file_name(coord))
    }

    pub fn exists(&self, coord: ChunkCoord) -> bool {
        self.path_for(coord).is_file()
    }

    /// Reads a saved chunk, or `None` when it was never saved.
    pub fn load(&self, coord: ChunkCoord, dims: ChunkDims) -> io::Result<Option<Chunk>> {
        let path = self.path_for(coord);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let chunk = Chunk::read_from(&mut BufReader::new(file), dims)?;
        if chunk.coord() != coord {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} holds chunk {} instead of {}",
                    path.display(),
                    chunk.coord(),
                    coord
                ),
            ));
        }
        log::debug!("loaded {} from {}", chunk, path.display());
        Ok(Some(chunk))
    }

    /// Writes through a temporary file so a crash never leaves a truncated chunk behind.
    pub fn save(&self, chunk: &Chunk) -> io::Result<()> {
        let path = self.path_for(chunk.coord());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("tmp");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            chunk.write_to(&mut out)?;
            out.flush()?;
        }
        fs::rename(&tmp, &path)?;
        log::debug!("saved {} to {}", chunk, path.display());
        Ok(())
    }
}
