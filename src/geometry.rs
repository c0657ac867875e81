//! Minimal vector math for the arena frame.
//!
//! Axes follow the host engine: `x` right, `y` up, `z` forward. Headings are
//! measured on the ground plane (rotation about `y`).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

const EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Drops the vertical component.
    pub fn ground(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Unsigned angle in degrees between two vectors, `0.0` if either is degenerate.
pub fn angle_deg(from: Vec3, to: Vec3) -> f32 {
    let denom = from.length() * to.length();
    if denom < EPSILON {
        return 0.0;
    }
    let cos = (from.dot(to) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Angle from `from` to `to`, signed by which side of `axis` the rotation falls.
/// A zero sign test counts as positive.
pub fn signed_angle_deg(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = angle_deg(from, to);
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Signed ground-plane heading between the agent's forward vector and the
/// direction to `target`. Negative means the target lies to the right.
pub fn heading_delta_deg(position: Vec3, forward: Vec3, target: Vec3) -> f32 {
    let to_target = (target - position).ground();
    signed_angle_deg(to_target, forward.ground(), Vec3::UP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn target_straight_ahead_has_zero_heading() {
        let h = heading_delta_deg(Vec3::ZERO, Vec3::FORWARD, Vec3::new(0.0, 0.0, 10.0));
        assert!(close(h, 0.0), "heading={h}");
    }

    #[test]
    fn target_on_the_right_is_negative() {
        let h = heading_delta_deg(Vec3::ZERO, Vec3::FORWARD, Vec3::new(10.0, 0.0, 0.0));
        assert!(close(h, -90.0), "heading={h}");
        let h = heading_delta_deg(Vec3::ZERO, Vec3::FORWARD, Vec3::new(-10.0, 0.0, 0.0));
        assert!(close(h, 90.0), "heading={h}");
    }

    #[test]
    fn height_difference_is_ignored() {
        let flat = heading_delta_deg(Vec3::ZERO, Vec3::FORWARD, Vec3::new(3.0, 0.0, 4.0));
        let raised = heading_delta_deg(Vec3::ZERO, Vec3::FORWARD, Vec3::new(3.0, 50.0, 4.0));
        assert!(close(flat, raised));
    }

    #[test]
    fn degenerate_direction_yields_zero() {
        let h = heading_delta_deg(Vec3::new(1.0, 0.0, 1.0), Vec3::FORWARD, Vec3::new(1.0, 9.0, 1.0));
        assert_eq!(h, 0.0);
    }
}
