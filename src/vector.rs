//! Angle and vector helpers shared by the tracer, sampler and viewer.

use glam::DVec2;

use crate::error::DegenerateVector;

/// Unit vector pointing along `angle_deg` (0° is +x, 90° is +y).
#[inline]
pub fn vector_from_angle(angle_deg: f64) -> DVec2 {
    let rad = angle_deg.to_radians();
    let v = DVec2::new(rad.cos(), rad.sin());
    // Non-finite angles stay NaN so the tracer rejects the ray.
    v / v.length()
}

/// Divide `v` by its Euclidean norm.
pub fn normalize(v: DVec2) -> Result<DVec2, DegenerateVector> {
    let len = v.length();
    if len == 0.0 || !len.is_finite() {
        return Err(DegenerateVector);
    }
    Ok(v / len)
}

/// Planar distance between two points.
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Heading in degrees paired with its cached forward vector.
///
/// The vector is only ever derived from the angle, so the two can't drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    degrees: f64,
    forward: DVec2,
}

impl Heading {
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            degrees,
            forward: vector_from_angle(degrees),
        }
    }

    #[inline]
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    #[inline]
    pub fn forward(&self) -> DVec2 {
        self.forward
    }

    /// Turn by `delta_deg`. A zero delta leaves the heading untouched.
    pub fn rotate(&mut self, delta_deg: f64) {
        if delta_deg != 0.0 {
            self.set_degrees(self.degrees + delta_deg);
        }
    }

    pub fn set_degrees(&mut self, degrees: f64) {
        self.degrees = degrees;
        self.forward = vector_from_angle(degrees);
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::from_degrees(0.0)
    }
}
