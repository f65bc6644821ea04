use std::collections::BTreeSet;

use crate::content::{CharGrid, Marker, ROOM_X_CENTER, ROOM_Y_CENTER, TILE_SIZE};

use super::geometry::{Direction, IPoint, Vec2};

/// Vertical probe offsets from the sprite's top-left corner: the feet area.
const PROBE_OFFSETS_Y: [i32; 3] = [16, 32, 40];
const PROBE_OFFSETS_X: [i32; 3] = [0, 16, 18];

/// Timestamp of the last trigger of a time-gated effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    anchor: f64,
    duration: f64,
}

impl Cooldown {
    /// A cooldown that has already run out at time zero.
    pub fn expired(duration: f64) -> Self {
        Self {
            anchor: -duration - 1.0,
            duration,
        }
    }

    pub fn trigger(&mut self, now: f64) {
        self.anchor = now;
    }

    pub fn elapsed(&self, now: f64) -> bool {
        now > self.anchor + self.duration
    }

    /// Like [`Cooldown::elapsed`] but already true at the boundary instant.
    pub fn ready(&self, now: f64) -> bool {
        now >= self.anchor + self.duration
    }

    pub fn is_active(&self, now: f64) -> bool {
        !self.elapsed(now)
    }

    pub fn anchor(&self) -> f64 {
        self.anchor
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub(crate) real_position: Vec2,
    pub(crate) position: IPoint,
    pub(crate) facing: Direction,
    pub(crate) health: u32,
    pub(crate) pearls: u32,
    pub(crate) idle: bool,
    pub(crate) coral_cooldown: Cooldown,
    pub(crate) shield: Cooldown,
}

impl Player {
    pub fn new(starting_health: u32, coral_cooldown: f64, shield_duration: f64) -> Self {
        let position = spawn_position();
        Self {
            real_position: position.to_real(),
            position,
            facing: Direction::Down,
            health: starting_health,
            pearls: 0,
            idle: true,
            coral_cooldown: Cooldown::expired(coral_cooldown),
            shield: Cooldown::expired(shield_duration),
        }
    }

    pub fn position(&self) -> IPoint {
        self.position
    }

    pub fn real_position(&self) -> Vec2 {
        self.real_position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn pearls(&self) -> u32 {
        self.pearls
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn is_shielded(&self, now: f64) -> bool {
        self.shield.is_active(now)
    }

    pub fn coral_cooldown(&self) -> Cooldown {
        self.coral_cooldown
    }

    pub fn shield(&self) -> Cooldown {
        self.shield
    }

    pub(crate) fn commit(&mut self, real_position: Vec2) {
        self.real_position = real_position;
        self.position = real_position.truncate();
    }

    /// Places the player at an integer position and resyncs the real one.
    pub(crate) fn place(&mut self, position: IPoint) {
        self.position = position;
        self.real_position = position.to_real();
    }
}

/// Top-left pixel of the player before the first room transition.
pub fn spawn_position() -> IPoint {
    IPoint::new(
        ROOM_X_CENTER as i32 * TILE_SIZE,
        ROOM_Y_CENTER as i32 * TILE_SIZE - 20,
    )
}

/// Distinct markers under the nine probe points of a sprite at `position`.
/// Probes outside the grid read as wall.
pub fn probe_markers(objects: &CharGrid, position: IPoint) -> BTreeSet<Marker> {
    let mut markers = BTreeSet::new();
    for dy in PROBE_OFFSETS_Y {
        for dx in PROBE_OFFSETS_X {
            let column = (position.x + dx).div_euclid(TILE_SIZE);
            let row = (position.y + dy).div_euclid(TILE_SIZE);
            let marker = if column < 0 || row < 0 {
                None
            } else {
                objects.marker_at(column as usize, row as usize)
            };
            markers.insert(marker.unwrap_or(Marker::Wall));
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ROOM_HEIGHT, ROOM_WIDTH};

    #[test]
    fn cooldown_starts_expired_and_gates_after_trigger() {
        let mut cooldown = Cooldown::expired(1.5);
        assert!(cooldown.elapsed(0.0));
        cooldown.trigger(2.0);
        assert!(cooldown.is_active(3.0));
        assert!(cooldown.is_active(3.5));
        assert!(cooldown.elapsed(3.51));
    }

    #[test]
    fn ready_includes_boundary_instant() {
        let mut cooldown = Cooldown::expired(3.0);
        cooldown.trigger(1.0);
        assert!(!cooldown.ready(3.5));
        assert!(cooldown.ready(4.0));
        assert!(!cooldown.elapsed(4.0));
    }

    #[test]
    fn spawn_is_centered_above_middle_row() {
        assert_eq!(spawn_position(), IPoint::new(240, 156));
    }

    #[test]
    fn probes_cover_feet_area() {
        let mut objects = CharGrid::zeroed(ROOM_WIDTH, ROOM_HEIGHT);
        // Sprite at (32, 32) probes rows 3, 4, 4 and columns 2, 3, 3.
        objects.set(3, 4, b'c');
        objects.set(2, 3, b'p');
        let markers = probe_markers(&objects, IPoint::new(32, 32));
        assert!(markers.contains(&Marker::Coral));
        assert!(markers.contains(&Marker::Pearl));
        assert!(markers.contains(&Marker::Empty));
        assert!(!markers.contains(&Marker::Wall));

        let clear = probe_markers(&objects, IPoint::new(32, 80));
        assert_eq!(clear.into_iter().collect::<Vec<_>>(), vec![Marker::Empty]);
    }

    #[test]
    fn probes_outside_grid_read_as_wall() {
        let objects = CharGrid::zeroed(ROOM_WIDTH, ROOM_HEIGHT);
        assert!(probe_markers(&objects, IPoint::new(-1, 32)).contains(&Marker::Wall));
        assert!(probe_markers(&objects, IPoint::new(32, 290)).contains(&Marker::Wall));
    }

    #[test]
    fn commit_truncates_real_position() {
        let mut player = Player::new(5, 1.5, 3.0);
        player.commit(Vec2::new(10.9, 20.2));
        assert_eq!(player.position(), IPoint::new(10, 20));
        player.place(IPoint::new(4, 4));
        assert_eq!(player.real_position(), Vec2::new(4.0, 4.0));
    }
}
