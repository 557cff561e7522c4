use serde::Deserialize;

use crate::types::BlockForm;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u8>,
    #[serde(default)]
    pub translucent: Option<bool>,
    // Invisible blocks are skipped by the mesher and let full sunlight through.
    #[serde(default)]
    pub invisible: Option<bool>,
    #[serde(default)]
    pub form: Option<BlockForm>,
    #[serde(default)]
    pub luminance: Option<u8>,
}
