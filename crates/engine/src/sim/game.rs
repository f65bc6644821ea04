use thiserror::Error;
use tracing::{debug, info, warn};

use crate::content::{
    load_lab, load_room_objects, load_room_tiles, CharGrid, ConfigError, GameConfig, GridError,
    LabMap, Marker, RoomSource, ROOM_HEIGHT, ROOM_WIDTH, TILE_SIZE,
};

use super::animation::{lightning_index, looping_index, triangular_wave};
use super::clock::FrameClock;
use super::draw::{DrawCommand, Drawable};
use super::geometry::{Direction, IPoint};
use super::guards::{guard_step, step_guards};
use super::input::{InputAction, InputSnapshot};
use super::player::{probe_markers, Player};
use super::room::{RoomBackground, RoomContents, RoomKey};
use super::transition::{entry_position, RoomState, RoomTransition, TransitionEvent};

const HOLE_FRAME_PERIOD: u32 = 8;
const SPRITE_FRAME_PERIOD: u32 = 2;
const PEARL_FRAME_COUNT: u32 = 10;
const PEARL_FRAMES_PER_SECOND: f64 = 10.0;
const LIGHTNING_SCALE: f64 = 8.0;
const SCREEN_WIDTH_PX: i32 = ROOM_WIDTH as i32 * TILE_SIZE;
const SCREEN_HEIGHT_PX: i32 = ROOM_HEIGHT as i32 * TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Before the first room has been initialized.
    Uninitialized,
    Play,
    Over,
    Win,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Over | Self::Win)
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The whole simulation. The driver calls [`Game::update`] once per frame,
/// or the individual steps in the same order.
pub struct Game {
    config: GameConfig,
    source: Box<dyn RoomSource>,
    lab: LabMap,
    state: GameState,
    clock: FrameClock,
    transition: RoomTransition,
    current_room: IPoint,
    objects: CharGrid,
    background: RoomBackground,
    contents: RoomContents,
    player: Player,
}

impl Game {
    pub fn new(source: Box<dyn RoomSource>, config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let lab = load_lab(source.as_ref())?;
        let current_room = lab.initial_room();
        let mut game = Self {
            clock: FrameClock::new(config.fps_report_interval_seconds),
            transition: RoomTransition::starting(config.fade_half_seconds, current_room),
            player: Player::new(
                config.starting_health,
                config.coral_cooldown_seconds,
                config.pearl_cooldown_seconds,
            ),
            config,
            source,
            lab,
            state: GameState::Uninitialized,
            current_room,
            objects: CharGrid::zeroed(ROOM_WIDTH, ROOM_HEIGHT),
            background: RoomBackground::empty(ROOM_WIDTH, ROOM_HEIGHT),
            contents: RoomContents::default(),
        };
        game.init_room(current_room)?;
        Ok(game)
    }

    /// One frame: clock, guards, pearl activation, vertical then horizontal
    /// movement, fade sequencing.
    pub fn update(&mut self, current_time: f64, input: &InputSnapshot) -> Result<(), GridError> {
        self.advance_clock(current_time);
        if self.state != GameState::Play {
            return Ok(());
        }
        self.move_guards();
        if input.is_down(InputAction::ActivatePearl) {
            self.activate_pearl();
        }
        if let Some(direction) = input.vertical() {
            self.move_player(direction);
        }
        if let Some(direction) = input.horizontal() {
            self.move_player(direction);
        }
        self.check_room_change()
    }

    pub fn advance_clock(&mut self, current_time: f64) {
        self.clock.advance(current_time);
    }

    pub fn move_guards(&mut self) {
        if self.state != GameState::Play || !self.transition.is_normal() {
            return;
        }
        let now = self.clock.time();
        let step = guard_step(
            self.clock.average_delta(),
            self.config.guard_speed,
            self.player.is_shielded(now),
        );
        let caught = step_guards(
            self.contents.guards_mut(),
            self.player.real_position(),
            self.player.position(),
            step,
        );
        if caught {
            self.finish(GameState::Over, "caught_by_guard");
        }
    }

    pub fn move_player(&mut self, direction: Direction) {
        if self.state != GameState::Play || !self.transition.is_normal() {
            return;
        }
        let now = self.clock.time();
        self.player.idle = false;
        let step = self.clock.average_delta() * self.config.player_speed;
        let candidate_real = self.player.real_position().shift(direction, step);
        self.player.facing = direction;
        let candidate = candidate_real.truncate();
        let markers = probe_markers(&self.objects, candidate);

        if markers.contains(&Marker::Wall) {
            return;
        }
        let shielded = self.player.is_shielded(now);
        if markers.contains(&Marker::Coral)
            && self.player.coral_cooldown.elapsed(now)
            && !shielded
        {
            self.player.coral_cooldown.trigger(now);
            self.player.health = self.player.health.saturating_sub(1);
            debug!(health = self.player.health, "coral_hit");
            if self.player.health == 0 {
                self.finish(GameState::Over, "coral");
                return;
            }
        }
        if markers.contains(&Marker::Hole) && !shielded {
            self.finish(GameState::Over, "hole");
            return;
        }
        if markers.contains(&Marker::Exit) {
            let target = self.current_room.shift(direction, 1);
            if !self.lab.contains(target) {
                warn!(room_x = target.x, room_y = target.y, "exit_outside_lab");
                return;
            }
            debug!(
                from_x = self.current_room.x,
                from_y = self.current_room.y,
                to_x = target.x,
                to_y = target.y,
                "room_exit_triggered"
            );
            self.transition.begin(now, target);
            return;
        }
        if markers.contains(&Marker::Goal) {
            self.finish(GameState::Win, "goal");
            return;
        }
        if markers.contains(&Marker::Pearl) {
            self.collect_pearl(candidate);
        }
        self.player.commit(candidate_real);
    }

    pub fn activate_pearl(&mut self) {
        let now = self.clock.time();
        if self.state != GameState::Play
            || self.player.pearls == 0
            || !self.player.shield.ready(now)
        {
            return;
        }
        self.player.health = self.config.max_health;
        self.player.pearls -= 1;
        self.player.shield.trigger(now);
        debug!(pearls = self.player.pearls, "pearl_activated");
    }

    pub fn check_room_change(&mut self) -> Result<(), GridError> {
        match self.transition.tick(self.clock.time()) {
            TransitionEvent::SwitchRoom { target } => self.init_room(target)?,
            TransitionEvent::Finished => debug!("fade_finished"),
            TransitionEvent::None => {}
        }
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn fade_opacity(&self) -> Option<f64> {
        self.transition.fade_opacity()
    }

    pub fn room_state(&self) -> RoomState {
        self.transition.state()
    }

    pub fn player_position(&self) -> IPoint {
        self.player.position()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn current_room(&self) -> IPoint {
        self.current_room
    }

    pub fn room_key(&self) -> RoomKey {
        RoomKey::from_room(self.current_room)
    }

    pub fn objects(&self) -> &CharGrid {
        &self.objects
    }

    pub fn background(&self) -> &RoomBackground {
        &self.background
    }

    pub fn contents(&self) -> &RoomContents {
        &self.contents
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Back-to-front draw requests for the current frame.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let now = self.clock.time();
        let shielded = self.player.is_shielded(now);
        let mut commands = vec![DrawCommand::at_origin(Drawable::Background, 0)];

        if !shielded {
            for (index, hole) in self.contents.holes().iter().enumerate() {
                let scale = 10.0 * (index + 1) as f64;
                commands.push(DrawCommand::new(
                    hole.position,
                    Drawable::Hole,
                    triangular_wave(now, HOLE_FRAME_PERIOD, scale),
                ));
            }
        }

        let sprite_frame = triangular_wave(now, SPRITE_FRAME_PERIOD, 2.0);
        if self.state != GameState::Over {
            // Fast flicker while recovering from a coral hit.
            let player_frame = if self.player.coral_cooldown.is_active(now) {
                triangular_wave(now, SPRITE_FRAME_PERIOD, 10.0)
            } else {
                sprite_frame
            };
            commands.push(DrawCommand::new(
                self.player.position(),
                Drawable::Player(self.player.facing()),
                player_frame,
            ));
        }

        let pearl_frame = looping_index(now, PEARL_FRAMES_PER_SECOND, PEARL_FRAME_COUNT);
        for pearl in self.contents.pearls(self.room_key()) {
            if !pearl.collected {
                commands.push(DrawCommand::new(pearl.position, Drawable::Pearl, pearl_frame));
            }
        }

        for guard in self.contents.guards() {
            commands.push(DrawCommand::new(
                guard.position,
                Drawable::Guard(guard.facing),
                sprite_frame,
            ));
        }

        if shielded {
            let position = self.player.position();
            commands.push(DrawCommand::new(
                IPoint::new(
                    position.x + 9 - SCREEN_WIDTH_PX,
                    position.y + 20 - SCREEN_HEIGHT_PX,
                ),
                Drawable::Lightning,
                lightning_index(now, LIGHTNING_SCALE),
            ));
        }

        commands.push(DrawCommand::at_origin(
            Drawable::HealthBar,
            self.player.health(),
        ));
        for index in 0..self.player.pearls() as i32 {
            let column = ROOM_WIDTH as i32 / 2 + 1 + index * 3;
            commands.push(DrawCommand::new(
                IPoint::new(column * TILE_SIZE, 0),
                Drawable::PearlInventory,
                0,
            ));
        }

        match self.state {
            GameState::Win => commands.push(DrawCommand::at_origin(Drawable::WinOverlay, 0)),
            GameState::Over => commands.push(DrawCommand::at_origin(Drawable::GameOverOverlay, 0)),
            _ if self.player.is_idle() => {
                commands.push(DrawCommand::at_origin(Drawable::RulesOverlay, 0))
            }
            _ => {}
        }
        commands
    }

    /// Loads `room` completely before switching to it; on a load error the
    /// previous room stays current.
    fn init_room(&mut self, room: IPoint) -> Result<(), GridError> {
        // Always a lab cell: exits outside are rejected.
        let room_type = self.lab.room_type(room).unwrap_or(0);
        let (base, overlay) = load_room_tiles(self.source.as_ref(), room_type)?;
        let objects = load_room_objects(self.source.as_ref(), room_type)?;

        self.current_room = room;
        self.background = RoomBackground::compose(&base, &overlay);
        self.objects = objects;
        let key = self.room_key();
        self.contents.equip(&self.objects, key);

        let position = match self.state {
            GameState::Play => {
                entry_position(&self.objects, self.player.facing(), self.player.position())
            }
            GameState::Uninitialized => {
                self.state = GameState::Play;
                self.player.position()
            }
            GameState::Over | GameState::Win => self.player.position(),
        };
        self.player.place(position);

        info!(
            room_x = self.current_room.x,
            room_y = self.current_room.y,
            room_type = %(room_type as char),
            holes = self.contents.holes().len(),
            guards = self.contents.guards().len(),
            pearls = self.contents.pearls(key).len(),
            "room_entered"
        );
        Ok(())
    }

    fn collect_pearl(&mut self, candidate: IPoint) {
        if self.player.pearls >= self.config.max_pearls {
            return;
        }
        let key = self.room_key();
        if let Some(pearl) = self.contents.nearest_free_pearl_mut(key, candidate) {
            pearl.collected = true;
            self.player.pearls += 1;
            debug!(
                pearl_x = pearl.position.x,
                pearl_y = pearl.position.y,
                pearls = self.player.pearls,
                "pearl_collected"
            );
        }
    }

    fn finish(&mut self, state: GameState, cause: &'static str) {
        self.state = state;
        let position = self.player.position();
        match state {
            GameState::Win => info!(
                room_x = self.current_room.x,
                room_y = self.current_room.y,
                time = self.clock.time(),
                "game_won"
            ),
            _ => info!(
                cause,
                room_x = self.current_room.x,
                room_y = self.current_room.y,
                player_x = position.x,
                player_y = position.y,
                time = self.clock.time(),
                "game_over"
            ),
        }
    }
}
