mod animation;
mod clock;
mod draw;
mod game;
mod geometry;
mod guards;
mod input;
mod player;
mod room;
mod transition;

pub use animation::{lightning_index, looping_index, triangular_wave};
pub use clock::{FpsReport, FrameClock};
pub use draw::{DrawCommand, Drawable};
pub use game::{Game, GameError, GameState};
pub use geometry::{Direction, IPoint, Vec2};
pub use guards::{guard_step, step_guards};
pub use input::{InputAction, InputSnapshot};
pub use player::{probe_markers, spawn_position, Cooldown, Player};
pub use room::{
    BackgroundCell, Guard, Hole, Pearl, RoomBackground, RoomContents, RoomKey, PEARL_OFFSET,
};
pub use transition::{entry_position, RoomState, RoomTransition, TransitionEvent};
