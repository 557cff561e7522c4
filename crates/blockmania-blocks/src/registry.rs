use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::{BlockForm, BlockId};

const DEFAULT_BLOCKS: &str = include_str!("../assets/blocks.toml");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub translucent: bool,
    pub invisible: bool,
    pub form: BlockForm,
    pub luminance: u8,
}

impl BlockType {
    // Ids without a definition behave like plain stone: opaque, visible, unlit.
    fn unknown(id: BlockId) -> Self {
        Self {
            id,
            name: String::from("unknown"),
            translucent: false,
            invisible: false,
            form: BlockForm::Normal,
            luminance: 0,
        }
    }

    #[inline]
    pub fn is_billboard(&self) -> bool {
        self.form == BlockForm::Billboard
    }

    /// Whether this block ends the open-sky part of a column.
    #[inline]
    pub fn covers_sky(&self) -> bool {
        !self.invisible && !self.is_billboard()
    }
}

/// Dense lookup table indexed by block id; every one of the 256 ids resolves.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    blocks: Vec<BlockType>,
    by_name: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockRegistry {
    /// Registry with only the unknown fallback for every id except air.
    pub fn empty() -> Self {
        let mut blocks: Vec<BlockType> = (0..=u8::MAX).map(BlockType::unknown).collect();
        blocks[0] = BlockType {
            id: 0,
            name: String::from("air"),
            translucent: true,
            invisible: true,
            form: BlockForm::Normal,
            luminance: 0,
        };
        let mut by_name = HashMap::new();
        by_name.insert(String::from("air"), 0);
        Self { blocks, by_name }
    }

    /// The block set shipped with the engine.
    pub fn builtin() -> Self {
        match Self::from_toml_str(DEFAULT_BLOCKS) {
            Ok(reg) => reg,
            Err(e) => {
                log::error!("built-in block list failed to parse, using air only: {}", e);
                Self::empty()
            }
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(s)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = Self::empty();
        let mut next_id: u16 = 1;
        for def in cfg.blocks.into_iter() {
            let id = match def.id {
                Some(id) => id,
                None => u8::try_from(next_id)
                    .map_err(|_| format!("too many block types at '{}'", def.name))?,
            };
            next_id = next_id.max(u16::from(id) + 1);
            if let Some(prev) = reg.by_name.get(&def.name) {
                if *prev != id {
                    return Err(format!("duplicate block name '{}'", def.name).into());
                }
            }
            let luminance = def.luminance.unwrap_or(0);
            if luminance > 15 {
                return Err(format!("block '{}' luminance {} exceeds 15", def.name, luminance).into());
            }
            let invisible = def.invisible.unwrap_or(false);
            reg.by_name.insert(def.name.clone(), id);
            reg.blocks[id as usize] = BlockType {
                id,
                name: def.name,
                // Invisible blocks never stop light.
                translucent: def.translucent.unwrap_or(invisible),
                invisible,
                form: def.form.unwrap_or_default(),
                luminance,
            };
        }
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> &BlockType {
        &self.blocks[id as usize]
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn is_translucent(&self, id: BlockId) -> bool {
        self.blocks[id as usize].translucent
    }

    #[inline]
    pub fn is_invisible(&self, id: BlockId) -> bool {
        self.blocks[id as usize].invisible
    }

    #[inline]
    pub fn form(&self, id: BlockId) -> BlockForm {
        self.blocks[id as usize].form
    }

    #[inline]
    pub fn luminance(&self, id: BlockId) -> u8 {
        self.blocks[id as usize].luminance
    }

    /// Names of all explicitly defined blocks, in id order.
    pub fn defined(&self) -> impl Iterator<Item = &BlockType> {
        let mut ids: Vec<BlockId> = self.by_name.values().copied().collect();
        ids.sort_unstable();
        ids.into_iter().map(move |id| &self.blocks[id as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_parses_and_has_air_at_zero() {
        let reg = BlockRegistry::from_toml_str(DEFAULT_BLOCKS).expect("builtin blocks");
        assert_eq!(reg.id_by_name("air"), Some(0));
        assert!(reg.is_invisible(0));
        assert!(reg.is_translucent(0));
        let torch = reg.id_by_name("torch").unwrap();
        assert_eq!(reg.luminance(torch), 15);
        assert_eq!(reg.form(torch), BlockForm::Billboard);
    }

    #[test]
    fn builtin_matches_embedded_list() {
        let reg = BlockRegistry::builtin();
        assert_eq!(reg.id_by_name("stone"), Some(1));
        assert_eq!(reg.defined().count(), 12);
    }

    #[test]
    fn plants_are_billboards_that_let_sky_through() {
        let reg = BlockRegistry::builtin();
        for name in ["tall_grass", "red_flower"] {
            let id = reg.id_by_name(name).unwrap();
            assert_eq!(reg.form(id), BlockForm::Billboard, "{}", name);
            assert!(reg.is_translucent(id), "{}", name);
            assert!(!reg.get(id).covers_sky(), "{}", name);
        }
    }

    #[test]
    fn unknown_ids_are_opaque() {
        let reg = BlockRegistry::builtin();
        let t = reg.get(250);
        assert!(!t.translucent);
        assert!(t.covers_sky());
    }

    #[test]
    fn rejects_out_of_range_luminance() {
        let err = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "sun"
            luminance = 16
        "#,
        );
        assert!(err.is_err());
    }
}
