//! Axis-aligned geometry shared by every entity living on the playfield.

use glam::Vec2;

/// Vertical distance between the bottom of the playfield and both the player's
/// starting row and the floor on which pickups come to rest.
pub const GROUND_OFFSET: f32 = 64.0;

/// Axis-aligned bounding rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and its extent.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Smallest x coordinate covered by the rectangle.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// First x coordinate past the rectangle's right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Smallest y coordinate covered by the rectangle.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// First y coordinate past the rectangle's bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Geometric centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Reports whether the two rectangles share a region of positive area.
    ///
    /// Rectangles that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

/// Rectangular arena in which the whole simulation takes place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Playfield {
    /// Creates a playfield with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Rectangle covering the whole playfield.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Reports whether any part of the rectangle is still inside the playfield.
    #[must_use]
    pub fn contains(&self, rect: &Rect) -> bool {
        self.bounds().overlaps(rect)
    }

    /// Clamps a top-left corner so a box of `size` stays fully inside the playfield.
    #[must_use]
    pub fn clamp_origin(&self, origin: Vec2, size: Vec2) -> Vec2 {
        let max_y = (self.height - size.y).max(0.0);
        Vec2::new(self.clamp_x(origin.x, size.x), origin.y.clamp(0.0, max_y))
    }

    /// Clamps a left edge so a box `width` wide stays inside the playfield horizontally.
    #[must_use]
    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.clamp(0.0, (self.width - width).max(0.0))
    }

    /// Row at which falling pickups come to rest.
    #[must_use]
    pub fn pickup_floor(&self) -> f32 {
        self.height - GROUND_OFFSET
    }

    /// Position at which the player appears when a session starts.
    #[must_use]
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - GROUND_OFFSET)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(crate::PLAYFIELD_WIDTH, crate::PLAYFIELD_HEIGHT)
    }
}
