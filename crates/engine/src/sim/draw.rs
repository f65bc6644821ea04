use super::geometry::{Direction, IPoint};

/// Semantic identity of something the renderer draws. Frame selection is
/// carried separately as a variant index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drawable {
    /// The composed room background; see `Game::background`.
    Background,
    Hole,
    Player(Direction),
    Pearl,
    Guard(Direction),
    /// Shield effect; drawn additively over the whole screen.
    Lightning,
    HealthBar,
    PearlInventory,
    WinOverlay,
    GameOverOverlay,
    RulesOverlay,
}

/// One back-to-front draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub position: IPoint,
    pub drawable: Drawable,
    pub variant: u32,
}

impl DrawCommand {
    pub fn new(position: IPoint, drawable: Drawable, variant: u32) -> Self {
        Self {
            position,
            drawable,
            variant,
        }
    }

    pub fn at_origin(drawable: Drawable, variant: u32) -> Self {
        Self::new(IPoint::default(), drawable, variant)
    }
}
