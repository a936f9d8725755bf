//! Continuous world coordinates, tile coordinates, and orientation helpers.

use core::f32::consts::{PI, TAU};
use core::ops::{Add, AddAssign, Mul, Sub};

/// Point or displacement in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Angle of this vector in radians, measured from +x toward +y.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing the given world point.
    pub fn from_world(point: Vec2, tile_size: f32) -> Self {
        Self::new(
            (point.x / tile_size).floor() as i32,
            (point.y / tile_size).floor() as i32,
        )
    }

    /// World-space top-left corner of this tile.
    pub fn to_world(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// Euclidean distance between tile coordinates.
    pub fn distance(self, other: Self) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Cardinal orientation used to pick a sprite row.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Facing {
    Up,
    Right,
    #[default]
    Down,
    Left,
}

impl Facing {
    /// Orientation from whichever velocity axis has the greater magnitude.
    ///
    /// Ties go to the horizontal axis. A zero vector keeps `current`.
    pub fn from_velocity(velocity: Vec2, current: Self) -> Self {
        if velocity.x == 0.0 && velocity.y == 0.0 {
            return current;
        }
        if velocity.x.abs() >= velocity.y.abs() {
            if velocity.x >= 0.0 { Self::Right } else { Self::Left }
        } else if velocity.y >= 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Sprite-sheet row for this orientation.
    pub const fn row(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Right => 1,
            Self::Up => 2,
            Self::Left => 3,
        }
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in `(-π, π]`.
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let delta = wrap_angle(to - from);
    if delta > PI { delta - TAU } else { delta }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_prefers_horizontal_axis_on_tie() {
        let facing = Facing::from_velocity(Vec2::new(-2.0, 2.0), Facing::Down);
        assert_eq!(facing, Facing::Left);
        let facing = Facing::from_velocity(Vec2::new(0.5, -3.0), Facing::Down);
        assert_eq!(facing, Facing::Up);
    }

    #[test]
    fn zero_velocity_keeps_current_facing() {
        assert_eq!(
            Facing::from_velocity(Vec2::ZERO, Facing::Right),
            Facing::Right
        );
    }

    #[test]
    fn angles_wrap_modulo_full_turn() {
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(-1.0) - (TAU - 1.0)).abs() < 1e-5);
        assert!((angle_delta(0.1, TAU - 0.1) + 0.2).abs() < 1e-5);
    }

    #[test]
    fn tile_conversion_floors_negative_coordinates() {
        let tile = TilePos::from_world(Vec2::new(-1.0, 130.0), 64.0);
        assert_eq!(tile, TilePos::new(-1, 2));
        assert_eq!(TilePos::new(0, 0).distance(TilePos::new(3, 4)), 5.0);
    }
}
