//! Flood-fill sky and block light across chunk boundaries.
//!
//! Every operation works against a [`LightVolume`], so the same code lights a
//! single chunk during generation and the whole resident world after edits.
#![forbid(unsafe_code)]

mod column;
mod propagate;
mod volume;

pub use blockmania_chunk::{LightKind, MAX_LIGHT};
pub use column::{generate_sunlight, refresh_sunlight_column, relight_chunk};
pub use propagate::{DIRECTIONS, refresh_light_at, spread_light, unspread_light};
pub use volume::{ChunkVolume, LightVolume};
