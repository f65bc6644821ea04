use crate::content::{CharGrid, Marker, ROOM_X_CENTER, ROOM_Y_CENTER, TILE_SIZE};

use super::geometry::{Direction, IPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Normal,
    FadeOut,
    FadeIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    None,
    /// FADEOUT reached its midpoint; the caller must load `target` now.
    SwitchRoom { target: IPoint },
    Finished,
}

/// Fade-out / fade-in sequencing around a room change. `elapsed` runs from
/// the moment the fade began through both phases.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTransition {
    state: RoomState,
    change_begin: f64,
    elapsed: f64,
    fade_half: f64,
    target_room: IPoint,
}

impl RoomTransition {
    /// Mid-fade-in at time zero, so the first room fades in from black.
    pub fn starting(fade_half: f64, room: IPoint) -> Self {
        Self {
            state: RoomState::FadeIn,
            change_begin: -fade_half,
            elapsed: fade_half,
            fade_half,
            target_room: room,
        }
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn is_normal(&self) -> bool {
        self.state == RoomState::Normal
    }

    pub fn target_room(&self) -> IPoint {
        self.target_room
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn begin(&mut self, now: f64, target_room: IPoint) {
        self.target_room = target_room;
        self.change_begin = now;
        self.elapsed = 0.0;
        self.state = RoomState::FadeOut;
    }

    pub fn tick(&mut self, now: f64) -> TransitionEvent {
        self.elapsed = now - self.change_begin;
        match self.state {
            RoomState::Normal => TransitionEvent::None,
            RoomState::FadeOut if self.elapsed > self.fade_half => {
                self.state = RoomState::FadeIn;
                TransitionEvent::SwitchRoom {
                    target: self.target_room,
                }
            }
            RoomState::FadeIn if self.elapsed > self.fade_half * 2.0 => {
                self.state = RoomState::Normal;
                TransitionEvent::Finished
            }
            RoomState::FadeOut | RoomState::FadeIn => TransitionEvent::None,
        }
    }

    /// `None` means no overlay. Otherwise a ramp from 0 up to 1 at the phase
    /// boundary and back down to 0.
    pub fn fade_opacity(&self) -> Option<f64> {
        if self.state == RoomState::Normal {
            return None;
        }
        let ramp = 1.0 - (1.0 - self.elapsed / self.fade_half).abs();
        Some(ramp.clamp(0.0, 1.0))
    }
}

/// Where the player appears after entering a room while moving `direction`.
/// Without an exit marker on the matching center line the position is kept.
pub fn entry_position(objects: &CharGrid, direction: Direction, current: IPoint) -> IPoint {
    let exit = Marker::Exit.as_byte();
    let mut position = current;
    match direction {
        Direction::Right => {
            if let Some(column) = objects.find_in_row(ROOM_Y_CENTER, exit) {
                position.x = column as i32 * TILE_SIZE + 24;
            }
        }
        Direction::Left => {
            if let Some(column) = objects.rfind_in_row(ROOM_Y_CENTER, exit) {
                position.x = column as i32 * TILE_SIZE - 24;
            }
        }
        Direction::Down => {
            if let Some(row) = objects.find_in_column(ROOM_X_CENTER, exit) {
                position.y = row as i32 * TILE_SIZE + 8;
            }
        }
        Direction::Up => {
            if let Some(row) = objects.rfind_in_column(ROOM_X_CENTER, exit) {
                position.y = row as i32 * TILE_SIZE - 48;
            }
        }
    }
    position
}
