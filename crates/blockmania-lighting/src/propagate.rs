use std::collections::VecDeque;

use blockmania_blocks::BlockRegistry;
use blockmania_chunk::{LightKind, MAX_LIGHT};
use blockmania_world::WorldPos;
use hashbrown::HashSet;

use crate::volume::LightVolume;

/// Axis neighbors in visiting order: +X, -X, +Y, -Y, +Z, -Z.
pub const DIRECTIONS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

#[inline]
fn neighbors(p: WorldPos) -> impl Iterator<Item = WorldPos> {
    DIRECTIONS.into_iter().map(move |(dx, dy, dz)| p.offset(dx, dy, dz))
}

#[inline]
fn conducts<V: LightVolume + ?Sized>(vol: &V, reg: &BlockRegistry, p: WorldPos) -> bool {
    vol.accepts_light(p) && reg.is_translucent(vol.block(p))
}

/// Floods `value` outward from `origin`, losing one level per step.
///
/// The origin is set to `value`; a translucent neighbor is raised to
/// `current - 1` when it holds less than that.
pub fn spread_light<V: LightVolume + ?Sized>(
    vol: &mut V,
    reg: &BlockRegistry,
    origin: WorldPos,
    kind: LightKind,
    value: u8,
) {
    let value = value.min(MAX_LIGHT);
    if value == 0 {
        return;
    }
    vol.set_light(origin, kind, value);
    let mut queue = VecDeque::new();
    queue.push_back((origin, value));
    while let Some((p, lv)) = queue.pop_front() {
        // Dropped write or overtaken by a brighter source.
        if vol.light(p, kind) != lv || lv < 2 {
            continue;
        }
        let next = lv - 1;
        for n in neighbors(p) {
            if !conducts(vol, reg, n) {
                continue;
            }
            if vol.light(n, kind) < next {
                vol.set_light(n, kind, next);
                queue.push_back((n, next));
            }
        }
    }
}

/// Retracts light that was fed from `origin` at intensity `value`, then
/// re-spreads every brighter cell found on the border of the cleared region.
pub fn unspread_light<V: LightVolume + ?Sized>(
    vol: &mut V,
    reg: &BlockRegistry,
    origin: WorldPos,
    kind: LightKind,
    value: u8,
) {
    let value = value.min(MAX_LIGHT);
    vol.set_light(origin, kind, 0);
    if value == 0 {
        return;
    }
    let mut bright: Vec<WorldPos> = Vec::new();
    let mut seen: HashSet<WorldPos> = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((origin, value));
    while let Some((p, lv)) = queue.pop_front() {
        for n in neighbors(p) {
            if !vol.accepts_light(n) {
                continue;
            }
            let nv = vol.light(n, kind);
            if nv > 0 && nv < lv && reg.is_translucent(vol.block(n)) {
                vol.set_light(n, kind, 0);
                queue.push_back((n, lv - 1));
            } else if nv >= lv && seen.insert(n) {
                bright.push(n);
            }
        }
    }
    log::trace!(target: "light", "unspread {:?} from {:?}: {} bright spots", kind, origin, bright.len());
    for p in bright {
        let v = vol.light(p, kind);
        spread_light(vol, reg, p, kind, v);
    }
}

/// Recomputes one cell from its six neighbors.
///
/// Opaque cells go dark. Translucent cells take `max(brightest neighbor - 1, 0)`
/// but never drop below their current value.
pub fn refresh_light_at<V: LightVolume + ?Sized>(
    vol: &mut V,
    reg: &BlockRegistry,
    p: WorldPos,
    kind: LightKind,
) {
    if !reg.is_translucent(vol.block(p)) {
        vol.set_light(p, kind, 0);
        return;
    }
    let current = vol.light(p, kind);
    let brightest = neighbors(p).map(|n| vol.light(n, kind)).max().unwrap_or(0);
    vol.set_light(p, kind, brightest.saturating_sub(1).max(current));
}
