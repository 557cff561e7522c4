use serde::{Deserialize, Serialize};

/// One byte per cell in chunk storage; 0 is always air.
pub type BlockId = u8;

pub const AIR: BlockId = 0;

/// Visual form of a block as far as lighting and meshing care.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockForm {
    #[default]
    Normal,
    /// Crossed quads (tall grass, flowers, torches). Never covers a sky column.
    Billboard,
}
