//! Arena geometry
//!
//! Platforms are axis-aligned rectangles with a top-left origin and y growing
//! downward. The arena is immutable once built; fighters only read it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{ARENA_WIDTH, FLOOR_Y};

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// A static platform fighters can stand on.
pub type Platform = Rect;

#[derive(Debug, Error, PartialEq)]
pub enum ArenaError {
    #[error("platform {index} has a non-finite coordinate")]
    NonFinitePlatform { index: usize },
    #[error("platform {index} must have a positive width and height")]
    DegeneratePlatform { index: usize },
    #[error("no platform spans the full floor width of {width}")]
    MissingFloor { width: f32 },
}

/// The static stage: world bounds plus an ordered platform list.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    width: f32,
    floor_y: f32,
    platforms: Vec<Platform>,
}

impl Arena {
    /// Build an arena, rejecting malformed platforms.
    ///
    /// At least one platform must cover the whole floor width so a fighter
    /// can never stand on empty space at ground level.
    pub fn new(platforms: Vec<Platform>) -> Result<Self, ArenaError> {
        for (index, platform) in platforms.iter().enumerate() {
            if !platform.is_finite() {
                return Err(ArenaError::NonFinitePlatform { index });
            }
            if platform.width <= 0.0 || platform.height <= 0.0 {
                return Err(ArenaError::DegeneratePlatform { index });
            }
        }

        let has_floor = platforms
            .iter()
            .any(|p| p.x <= 0.0 && p.right() >= ARENA_WIDTH);
        if !has_floor {
            return Err(ArenaError::MissingFloor { width: ARENA_WIDTH });
        }

        Ok(Self {
            width: ARENA_WIDTH,
            floor_y: FLOOR_Y,
            platforms,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }
}

impl Default for Arena {
    fn default() -> Self {
        ArenaMap::default().build()
    }
}

/// Built-in stage layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArenaMap {
    /// Ground plus two side ledges and a raised center ledge
    #[default]
    Classic,
    /// Ground only
    Flat,
}

impl ArenaMap {
    pub fn all() -> &'static [ArenaMap] {
        &[ArenaMap::Classic, ArenaMap::Flat]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArenaMap::Classic => "Classic",
            ArenaMap::Flat => "Flat",
        }
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let ground = Rect::new(0.0, 550.0, ARENA_WIDTH, 50.0);
        match self {
            ArenaMap::Classic => vec![
                ground,
                Rect::new(150.0, 450.0, 150.0, 20.0),
                Rect::new(500.0, 450.0, 150.0, 20.0),
                Rect::new(325.0, 350.0, 150.0, 20.0),
            ],
            ArenaMap::Flat => vec![ground],
        }
    }

    pub fn build(&self) -> Arena {
        Arena {
            width: ARENA_WIDTH,
            floor_y: FLOOR_Y,
            platforms: self.platforms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_maps_are_valid() {
        for map in ArenaMap::all() {
            let arena = Arena::new(map.platforms());
            assert!(arena.is_ok(), "{} should be a valid arena", map.name());
        }
    }

    #[test]
    fn test_arena_without_floor_is_rejected() {
        let result = Arena::new(vec![Rect::new(150.0, 450.0, 150.0, 20.0)]);
        assert_eq!(result, Err(ArenaError::MissingFloor { width: ARENA_WIDTH }));
    }

    #[test]
    fn test_nan_platform_is_rejected() {
        let result = Arena::new(vec![
            Rect::new(0.0, 550.0, ARENA_WIDTH, 50.0),
            Rect::new(f32::NAN, 450.0, 150.0, 20.0),
        ]);
        assert_eq!(result, Err(ArenaError::NonFinitePlatform { index: 1 }));
    }

    #[test]
    fn test_zero_height_platform_is_rejected() {
        let result = Arena::new(vec![Rect::new(0.0, 550.0, ARENA_WIDTH, 0.0)]);
        assert_eq!(result, Err(ArenaError::DegeneratePlatform { index: 0 }));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }
}
