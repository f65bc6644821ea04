use std::collections::HashMap;

use thiserror::Error;

use crate::sim::{Direction, Drawable};

/// Tile images available to room backgrounds (`tiles/0` ..= `tiles/864`).
pub const TILE_COUNT: u16 = 865;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite key must not be empty")]
    Empty,
    #[error("sprite key must not start with '/'")]
    LeadingSlash,
    #[error("sprite key must not contain '\\\\'")]
    Backslash,
    #[error("sprite key must not contain '..'")]
    ParentTraversal,
    #[error("sprite key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
    #[error("sprite strip for {drawable:?} must have at least one frame")]
    NoFrames { drawable: Drawable },
}

pub(crate) fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::LeadingSlash);
    }
    if key.contains('\\') {
        return Err(SpriteKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    for ch in key.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-') {
            continue;
        }
        return Err(SpriteKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

/// Frames of one drawable: `prefix` followed by the frame number, or just
/// `prefix` for single-frame strips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteStrip {
    prefix: String,
    frame_count: u32,
}

impl SpriteStrip {
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn key(&self, variant: u32) -> Option<String> {
        if variant >= self.frame_count {
            return None;
        }
        if self.frame_count == 1 {
            Some(self.prefix.clone())
        } else {
            Some(format!("{}{}", self.prefix, variant))
        }
    }
}

/// Maps drawables to the sprite keys an asset layer resolves.
#[derive(Debug, Clone, Default)]
pub struct SpriteTable {
    strips: HashMap<Drawable, SpriteStrip>,
}

impl SpriteTable {
    /// The lab's stock art set.
    pub fn standard() -> Self {
        let mut strips = HashMap::new();
        let mut put = |drawable: Drawable, prefix: String, frame_count: u32| {
            strips.insert(
                drawable,
                SpriteStrip {
                    prefix,
                    frame_count,
                },
            );
        };
        for direction in Direction::ALL {
            put(
                Drawable::Player(direction),
                format!("sprites/player_{}_", direction.as_token()),
                3,
            );
            put(
                Drawable::Guard(direction),
                format!("sprites/guard_{}_", direction.as_token()),
                3,
            );
        }
        put(Drawable::Hole, "objects/hole".to_string(), 9);
        put(Drawable::HealthBar, "objects/hb".to_string(), 9);
        put(Drawable::Pearl, "objects/pearl_16_".to_string(), 10);
        put(Drawable::PearlInventory, "objects/pearl_glow".to_string(), 1);
        put(Drawable::Lightning, "objects/lightning".to_string(), 5);
        put(Drawable::GameOverOverlay, "objects/game_over".to_string(), 1);
        put(Drawable::WinOverlay, "objects/game_win".to_string(), 1);
        put(Drawable::RulesOverlay, "objects/game_begin".to_string(), 1);
        Self { strips }
    }

    /// Replaces the strip for `drawable` after validating every key it yields.
    pub fn insert(
        &mut self,
        drawable: Drawable,
        prefix: &str,
        frame_count: u32,
    ) -> Result<(), SpriteKeyError> {
        if frame_count == 0 {
            return Err(SpriteKeyError::NoFrames { drawable });
        }
        let strip = SpriteStrip {
            prefix: prefix.to_string(),
            frame_count,
        };
        for variant in 0..frame_count {
            if let Some(key) = strip.key(variant) {
                validate_sprite_key(&key)?;
            }
        }
        self.strips.insert(drawable, strip);
        Ok(())
    }

    pub fn strip(&self, drawable: Drawable) -> Option<&SpriteStrip> {
        self.strips.get(&drawable)
    }

    pub fn key(&self, drawable: Drawable, variant: u32) -> Option<String> {
        self.strips.get(&drawable)?.key(variant)
    }

    pub fn tile_key(&self, tile: u16) -> Option<String> {
        (tile < TILE_COUNT).then(|| format!("tiles/{tile}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_keys() {
        for key in ["player", "ui/icons/worker_1", "a-b/c_d"] {
            assert!(validate_sprite_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in ["", "/a", "..", "a/../b", r"a\b", "A", "a.b"] {
            assert!(validate_sprite_key(key).is_err(), "key={key}");
        }
    }

    #[test]
    fn standard_table_keys_are_valid() {
        let table = SpriteTable::standard();
        for (drawable, strip) in &table.strips {
            for variant in 0..strip.frame_count() {
                let key = strip.key(variant).expect("in range");
                assert!(
                    validate_sprite_key(&key).is_ok(),
                    "drawable={drawable:?} key={key}"
                );
            }
        }
    }

    #[test]
    fn keys_follow_asset_naming() {
        let table = SpriteTable::standard();
        assert_eq!(
            table.key(Drawable::Player(Direction::Left), 2).as_deref(),
            Some("sprites/player_left_2")
        );
        assert_eq!(
            table.key(Drawable::Pearl, 9).as_deref(),
            Some("objects/pearl_16_9")
        );
        assert_eq!(
            table.key(Drawable::PearlInventory, 0).as_deref(),
            Some("objects/pearl_glow")
        );
        assert_eq!(table.key(Drawable::HealthBar, 9), None);
        assert_eq!(table.key(Drawable::Background, 0), None);
        assert_eq!(table.tile_key(774).as_deref(), Some("tiles/774"));
        assert_eq!(table.tile_key(TILE_COUNT), None);
    }

    #[test]
    fn insert_validates_every_frame() {
        let mut table = SpriteTable::default();
        assert_eq!(
            table.insert(Drawable::Hole, "Objects/hole", 2),
            Err(SpriteKeyError::InvalidCharacter { character: 'O' })
        );
        assert_eq!(
            table.insert(Drawable::Hole, "objects/hole", 0),
            Err(SpriteKeyError::NoFrames {
                drawable: Drawable::Hole
            })
        );
        table
            .insert(Drawable::Hole, "custom/pit_", 4)
            .expect("valid strip");
        assert_eq!(
            table.key(Drawable::Hole, 3).as_deref(),
            Some("custom/pit_3")
        );
    }
}
