use serde::{Deserialize, Serialize};

use super::geometry::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ActivatePearl,
}

const ACTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::ActivatePearl => 4,
        }
    }
}

/// Held actions for one frame, handed to `Game::update` by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: &[InputAction]) -> Self {
        actions
            .iter()
            .fold(Self::empty(), |snapshot, action| snapshot.with_action_down(*action, true))
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    /// Up wins over down when both are held.
    pub fn vertical(&self) -> Option<Direction> {
        if self.is_down(InputAction::MoveUp) {
            Some(Direction::Up)
        } else if self.is_down(InputAction::MoveDown) {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Left wins over right when both are held.
    pub fn horizontal(&self) -> Option<Direction> {
        if self.is_down(InputAction::MoveLeft) {
            Some(Direction::Left)
        } else if self.is_down(InputAction::MoveRight) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_resolve_per_axis() {
        let snapshot = InputSnapshot::from_actions(&[
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
        ]);
        assert_eq!(snapshot.vertical(), Some(Direction::Up));
        assert_eq!(snapshot.horizontal(), Some(Direction::Left));
    }

    #[test]
    fn released_action_is_not_down() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::ActivatePearl, true)
            .with_action_down(InputAction::ActivatePearl, false);
        assert!(!snapshot.is_down(InputAction::ActivatePearl));
        assert_eq!(snapshot.vertical(), None);
        assert_eq!(snapshot.horizontal(), None);
    }

    #[test]
    fn action_names_are_snake_case() {
        let action: InputAction = serde_json::from_str("\"activate_pearl\"").expect("parse");
        assert_eq!(action, InputAction::ActivatePearl);
    }
}
