//! Planar positions in Einstein-radius units.

/// A point in the lens plane, measured in Einstein radii.
///
/// The frame of reference is the source star, which sits at [`Position::ORIGIN`]
/// for the whole run. The lens moves along the x axis; the companion orbits
/// the lens.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Horizontal coordinate (transit axis).
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// The origin, where the source star is pinned.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A point at `radius` from the origin in direction `angle` (radians,
    /// counter-clockwise from +x).
    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    /// This position translated by `delta`.
    pub fn offset(self, delta: Position) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    /// Euclidean distance from the origin.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
