use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Chunk volume in blocks. Fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChunkDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl ChunkDims {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.x * self.y * self.z
    }

    #[inline]
    pub fn contains(self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.x
            && (y as usize) < self.y
            && (z as usize) < self.z
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::new(16, 128, 16)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainParams {
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_dirt_depth")]
    pub dirt_depth: i32,
    /// Chance per column that a tree is rooted there.
    #[serde(default = "default_tree_chance")]
    pub tree_chance: f32,
    #[serde(default = "default_grass_chance")]
    pub grass_chance: f32,
    #[serde(default = "default_ore_veins")]
    pub ore_veins: u32,
}

fn default_sea_level() -> i32 {
    48
}
fn default_amplitude() -> f32 {
    18.0
}
fn default_frequency() -> f32 {
    0.015
}
fn default_dirt_depth() -> i32 {
    3
}
fn default_tree_chance() -> f32 {
    0.01
}
fn default_grass_chance() -> f32 {
    0.08
}
fn default_ore_veins() -> u32 {
    6
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            sea_level: default_sea_level(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            dirt_depth: default_dirt_depth(),
            tree_chance: default_tree_chance(),
            grass_chance: default_grass_chance(),
            ore_veins: default_ore_veins(),
        }
    }
}

/// Startup configuration handed to the world and every chunk it creates.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub chunk: ChunkDims,
    #[serde(default)]
    pub seed: i32,
    /// Chunk files are written under this directory when set.
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
    #[serde(default = "default_view_radius")]
    pub view_radius: i32,
    #[serde(default = "default_mesh_workers")]
    pub mesh_workers: usize,
    #[serde(default)]
    pub terrain: TerrainParams,
}

fn default_view_radius() -> i32 {
    4
}
fn default_mesh_workers() -> usize {
    2
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkDims::default(),
            seed: 0,
            save_dir: None,
            view_radius: default_view_radius(),
            mesh_workers: default_mesh_workers(),
            terrain: TerrainParams::default(),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let d = self.chunk;
        if d.x == 0 || d.y == 0 || d.z == 0 {
            return Err(format!("chunk dimensions must be non-zero, got {}x{}x{}", d.x, d.y, d.z).into());
        }
        if d.x > i32::MAX as usize || d.y > i32::MAX as usize || d.z > i32::MAX as usize {
            return Err("chunk dimensions overflow i32".into());
        }
        Ok(())
    }
}

pub fn load_world_config(path: &Path) -> Result<WorldConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldConfig = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: WorldConfig = toml::from_str(
            r#"
            seed = 7
            [chunk]
            x = 8
            y = 64
            z = 8
        "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.chunk, ChunkDims::new(8, 64, 8));
        assert_eq!(cfg.view_radius, 4);
        assert_eq!(cfg.terrain.sea_level, 48);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let cfg = WorldConfig {
            chunk: ChunkDims::new(0, 1, 1),
            ..WorldConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
