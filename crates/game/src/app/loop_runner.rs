use std::fmt;
use std::process::ExitCode;

use depths_engine::{ConfigError, Game, GameError, GameState, GridError, IPoint, StartupError};
use thiserror::Error;
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::script::{InputScript, ScriptError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Where a headless run ended up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunSummary {
    pub(crate) state: GameState,
    pub(crate) room: IPoint,
    pub(crate) position: IPoint,
    pub(crate) health: u32,
    pub(crate) pearls: u32,
    pub(crate) frames: u64,
    pub(crate) seconds: f64,
}

impl RunSummary {
    fn capture(game: &Game, frames: u64) -> Self {
        let player = game.player();
        Self {
            state: game.state(),
            room: game.current_room(),
            position: player.position(),
            health: player.health(),
            pearls: player.pearls(),
            frames,
            seconds: game.clock().time(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={:?} room=({},{}) position=({},{}) health={} pearls={} frames={} time={:.3}s",
            self.state,
            self.room.x,
            self.room.y,
            self.position.x,
            self.position.y,
            self.health,
            self.pearls,
            self.frames,
            self.seconds
        )
    }
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring { mut game, script } = app;
    match run_script(&mut game, &script) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "run_failed");
            ExitCode::FAILURE
        }
    }
}

/// Feeds the script to `game` on a virtual clock. Stops early on a terminal
/// state or once `max_seconds` of simulated time have run.
pub(crate) fn run_script(game: &mut Game, script: &InputScript) -> Result<RunSummary, GridError> {
    let frame_delta = script.frame_delta();
    let max_frames = script.max_frames();
    let mut frames = 0u64;

    'steps: for step in &script.steps {
        let snapshot = step.snapshot();
        for _ in 0..step.frame_count(script.frames_per_second) {
            if frames >= max_frames || game.state().is_terminal() {
                break 'steps;
            }
            frames += 1;
            game.update(frames as f64 * frame_delta, &snapshot)?;
        }
    }

    let summary = RunSummary::capture(game, frames);
    info!(
        state = ?summary.state,
        frames = summary.frames,
        seconds = summary.seconds,
        "run_complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use depths_engine::{DirSource, GameConfig, MemorySource, ResourceKind};

    use super::*;

    const WIDTH: usize = 31;
    const HEIGHT: usize = 20;

    /// Walled room with `marker` filling `column` across the rows under the
    /// spawn point.
    fn room_text(column: usize, marker: char) -> String {
        let mut rows = Vec::with_capacity(HEIGHT);
        for row in 0..HEIGHT {
            let mut line: Vec<char> = (0..WIDTH)
                .map(|col| {
                    if row == 0 || row == HEIGHT - 1 || col == 0 || col == WIDTH - 1 {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();
            if (10..=12).contains(&row) {
                line[column] = marker;
            }
            rows.push(line.into_iter().collect::<String>());
        }
        rows.join("\n")
    }

    fn game_with_room(objects: String) -> Game {
        let source = MemorySource::new()
            .with(ResourceKind::Lab, "@")
            .with(ResourceKind::RoomObjects(b'@'), objects);
        Game::new(Box::new(source), GameConfig::default()).expect("game starts")
    }

    fn script(raw: &str) -> InputScript {
        InputScript::parse(raw, Path::new("test.json")).expect("valid script")
    }

    #[test]
    fn runs_every_step_frame_on_the_virtual_clock() {
        let mut game = game_with_room(room_text(1, '.'));
        let script = script(
            r#"{ "steps": [ { "seconds": 0.5 }, { "seconds": 0.5, "actions": ["move_right"] } ] }"#,
        );
        let summary = run_script(&mut game, &script).expect("run");
        assert_eq!(summary.frames, 60);
        assert_eq!(summary.state, GameState::Play);
        assert!((summary.seconds - 1.0).abs() < 1e-9);
        assert!(summary.position.x > 270, "summary={summary}");
        assert_eq!(summary.position.y, 156);
    }

    #[test]
    fn stops_at_terminal_state() {
        let mut game = game_with_room(room_text(17, 'h'));
        let script = script(r#"{ "steps": [ { "seconds": 2, "actions": ["move_right"] } ] }"#);
        let summary = run_script(&mut game, &script).expect("run");
        assert_eq!(summary.state, GameState::Over);
        assert!(summary.frames < 120, "summary={summary}");
    }

    #[test]
    fn max_seconds_caps_the_run() {
        let mut game = game_with_room(room_text(1, '.'));
        let script = script(
            r#"{ "frames_per_second": 30, "max_seconds": 1, "steps": [ { "seconds": 10 } ] }"#,
        );
        let summary = run_script(&mut game, &script).expect("run");
        assert_eq!(summary.frames, 30);
    }

    #[test]
    fn summary_line_lists_outcome() {
        let summary = RunSummary {
            state: GameState::Win,
            room: IPoint::new(2, 3),
            position: IPoint::new(100, 60),
            health: 4,
            pearls: 1,
            frames: 90,
            seconds: 1.5,
        };
        assert_eq!(
            summary.to_string(),
            "state=Win room=(2,3) position=(100,60) health=4 pearls=1 frames=90 time=1.500s"
        );
    }

    #[test]
    fn sample_tour_runs_through_shipped_lab() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let config = GameConfig::load_or_default(&root.join("assets/config.json")).expect("config");
        let mut game = Game::new(Box::new(DirSource::new(root.join("assets/lab"))), config)
            .expect("sample lab loads");
        let script =
            InputScript::load(&root.join("assets/scripts/tour.json")).expect("sample script");

        let summary = run_script(&mut game, &script).expect("run");
        assert!(summary.frames > 0);
        assert!(summary.frames <= script.max_frames());
        assert_ne!(summary.room, IPoint::new(0, 0), "summary={summary}");
    }
}
