use super::geometry::{Direction, IPoint, Vec2};
use super::room::Guard;

/// Signed per-frame guard step: toward the player normally, away from it at
/// twice the speed while the shield is up.
pub fn guard_step(average_delta: f64, guard_speed: f64, shielded: bool) -> f64 {
    let step = average_delta * guard_speed;
    if shielded {
        -step * 2.0
    } else {
        step
    }
}

/// Moves every guard one step per axis relative to the player's real
/// position. Returns true when any guard lands on the player's integer
/// position.
pub fn step_guards(
    guards: &mut [Guard],
    player_real: Vec2,
    player_position: IPoint,
    step: f64,
) -> bool {
    let mut caught = false;
    for guard in guards.iter_mut() {
        step_guard(guard, player_real, step);
        if guard.position == player_position {
            caught = true;
        }
    }
    caught
}

fn step_guard(guard: &mut Guard, player_real: Vec2, step: f64) {
    if guard.real_position.y > player_real.y {
        guard.real_position.y -= step;
        guard.facing = Direction::Up;
    } else if guard.real_position.y < player_real.y {
        guard.real_position.y += step;
        guard.facing = Direction::Down;
    }
    // Horizontal facing overrides vertical on diagonal steps.
    if guard.real_position.x > player_real.x {
        guard.real_position.x -= step;
        guard.facing = Direction::Left;
    } else if guard.real_position.x < player_real.x {
        guard.real_position.x += step;
        guard.facing = Direction::Right;
    }
    guard.position = guard.real_position.truncate();
}
