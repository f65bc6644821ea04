use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Integer pixel position, or a lab coordinate when used for rooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn shift(self, direction: Direction, step: i32) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - step),
            Direction::Down => Self::new(self.x, self.y + step),
            Direction::Left => Self::new(self.x - step, self.y),
            Direction::Right => Self::new(self.x + step, self.y),
        }
    }

    pub fn sqr_dist(self, other: IPoint) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }

    pub fn to_real(self) -> Vec2 {
        Vec2 {
            x: f64::from(self.x),
            y: f64::from(self.y),
        }
    }
}

/// Continuous pixel position. Truncation toward zero yields the displayed
/// integer position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn shift(self, direction: Direction, step: f64) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - step),
            Direction::Down => Self::new(self.x, self.y + step),
            Direction::Left => Self::new(self.x - step, self.y),
            Direction::Right => Self::new(self.x + step, self.y),
        }
    }

    pub fn truncate(self) -> IPoint {
        IPoint {
            x: self.x as i32,
            y: self.y as i32,
        }
    }
}
