use std::collections::BTreeMap;

use tracing::debug;

use crate::content::{
    CharGrid, Marker, TileGrid, GUARD_MAP_TILE, HOLE_MAP_TILE, LAB_SIZE, TILE_SIZE,
};

use super::geometry::{Direction, IPoint, Vec2};

/// Stable identity of a lab cell: `row * LAB_SIZE + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomKey(pub i32);

impl RoomKey {
    pub fn from_room(room: IPoint) -> Self {
        Self(room.y * LAB_SIZE as i32 + room.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hole {
    pub position: IPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guard {
    pub position: IPoint,
    pub facing: Direction,
    pub real_position: Vec2,
}

impl Guard {
    fn spawn_at(position: IPoint) -> Self {
        Self {
            position,
            facing: Direction::Down,
            real_position: position.to_real(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pearl {
    pub position: IPoint,
    pub collected: bool,
}

/// Pearl sprites are 16px centred on the corner shared by a 2x2 marker block.
pub const PEARL_OFFSET: i32 = 8;

/// Entities of the active room plus pearl state for every room visited so
/// far. Holes and guards are rebuilt on each entry; a room's pearl list is
/// created on first entry and never regenerated.
#[derive(Debug, Clone, Default)]
pub struct RoomContents {
    holes: Vec<Hole>,
    guards: Vec<Guard>,
    pearls: BTreeMap<RoomKey, Vec<Pearl>>,
}

impl RoomContents {
    /// Only the first hole, guard and pearl marker of each row is captured.
    pub fn equip(&mut self, objects: &CharGrid, key: RoomKey) {
        self.holes.clear();
        self.guards.clear();
        let init_pearls = !self.pearls.contains_key(&key);
        let mut new_pearls = Vec::<Pearl>::new();

        for row in 0..objects.height() {
            let y = row as i32 * TILE_SIZE;
            if let Some(column) = objects.find_in_row(row, Marker::Hole.as_byte()) {
                self.holes.push(Hole {
                    position: IPoint::new(column as i32 * TILE_SIZE, y),
                });
            }
            if let Some(column) = objects.find_in_row(row, Marker::Guard.as_byte()) {
                self.guards
                    .push(Guard::spawn_at(IPoint::new(column as i32 * TILE_SIZE, y)));
            }
            if !init_pearls {
                continue;
            }
            if let Some(column) = objects.find_in_row(row, Marker::Pearl.as_byte()) {
                let position = IPoint::new(
                    column as i32 * TILE_SIZE - PEARL_OFFSET,
                    y - PEARL_OFFSET,
                );
                // Dedup against the previous entry only.
                let duplicate = new_pearls
                    .last()
                    .is_some_and(|last| last.position.x == position.x);
                if !duplicate {
                    new_pearls.push(Pearl {
                        position,
                        collected: false,
                    });
                }
            }
        }

        if init_pearls {
            debug!(room_key = key.0, pearl_count = new_pearls.len(), "room_pearls_created");
            self.pearls.insert(key, new_pearls);
        }
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn guards_mut(&mut self) -> &mut [Guard] {
        &mut self.guards
    }

    pub fn pearls(&self, key: RoomKey) -> &[Pearl] {
        self.pearls.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_pearl_list(&self, key: RoomKey) -> bool {
        self.pearls.contains_key(&key)
    }

    /// Nearest uncollected pearl of room `key` by squared distance; the
    /// earliest entry wins ties.
    pub fn nearest_free_pearl_mut(&mut self, key: RoomKey, from: IPoint) -> Option<&mut Pearl> {
        self.pearls
            .get_mut(&key)?
            .iter_mut()
            .filter(|pearl| !pearl.collected)
            .min_by_key(|pearl| pearl.position.sqr_dist(from))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundCell {
    pub base: u16,
    pub overlay: Option<u16>,
}

/// Static tile layers of the active room, composed for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomBackground {
    width: usize,
    height: usize,
    cells: Vec<BackgroundCell>,
}

impl RoomBackground {
    /// Overlay tiles are dropped where they are empty (`0`) or mark a hole or
    /// guard, since those are drawn from the simulated entity lists.
    pub fn compose(base: &TileGrid, overlay: &TileGrid) -> Self {
        let width = base.width();
        let height = base.height();
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for column in 0..width {
                let overlay = overlay
                    .tile_at(column, row)
                    .filter(|&tile| tile > 0 && tile != HOLE_MAP_TILE && tile != GUARD_MAP_TILE);
                cells.push(BackgroundCell {
                    base: base.tile_at(column, row).unwrap_or(0),
                    overlay,
                });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self::compose(&TileGrid::zeroed(width, height), &TileGrid::zeroed(width, height))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<BackgroundCell> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + column).copied()
    }
}
