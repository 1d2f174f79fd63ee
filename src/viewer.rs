use glam::DVec2;

use crate::config::ViewerSettings;
use crate::vector::Heading;

/// Input and timing snapshot for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Elapsed time in seconds, already clamped by the caller.
    pub dt: f64,
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// The point of view rays are cast from. It is not placed in the grid and
/// never blocks rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub position: DVec2, // grid units
    heading: Heading,
    pub speed: f64,          // cells per second
    pub rotation_speed: f64, // degrees per second
}

impl Viewer {
    pub fn new(position: DVec2, heading_deg: f64, speed: f64, rotation_speed: f64) -> Self {
        Self {
            position,
            heading: Heading::from_degrees(heading_deg),
            speed,
            rotation_speed,
        }
    }

    /// Viewer standing at the centre of the configured spawn cell, facing +x.
    pub fn spawn(settings: &ViewerSettings) -> Self {
        let position = settings.spawn.as_dvec2() + DVec2::splat(0.5);
        Self::new(position, 0.0, settings.speed, settings.rotation_speed)
    }

    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading.degrees()
    }

    #[inline]
    pub fn forward(&self) -> DVec2 {
        self.heading.forward()
    }

    pub fn rotate(&mut self, delta_deg: f64) {
        self.heading.rotate(delta_deg);
    }

    pub fn set_heading(&mut self, degrees: f64) {
        self.heading.set_degrees(degrees);
    }

    /// Move along the forward vector by `distance` grid units (negative backs up).
    pub fn advance(&mut self, distance: f64) {
        self.position += self.forward() * distance;
    }

    /// Integrate one frame of input. Movement uses the heading from before the
    /// frame's rotation. No collision is applied.
    pub fn update(&mut self, input: &FrameInput) {
        debug_assert!(input.dt >= 0.0, "frame dt must be non-negative");

        let forward_delta = self.speed * input.dt * axis(input.forward, input.backward);
        if forward_delta != 0.0 {
            self.advance(forward_delta);
        }

        let rotation_delta = self.rotation_speed * input.dt * axis(input.right, input.left);
        self.rotate(rotation_delta);
    }
}

#[inline]
fn axis(positive: bool, negative: bool) -> f64 {
    (positive as i8 - negative as i8) as f64
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::UVec2;

    use super::*;
    use crate::vector::vector_from_angle;

    fn viewer() -> Viewer {
        Viewer::new(DVec2::new(1.5, 1.5), 0.0, 2.0, 90.0)
    }

    #[test]
    fn spawns_at_cell_centre() {
        let settings = ViewerSettings {
            spawn: UVec2::new(1, 1),
            ..Default::default()
        };
        let viewer = Viewer::spawn(&settings);
        assert_eq!(viewer.position, DVec2::new(1.5, 1.5));
        assert_eq!(viewer.heading(), 0.0);
        assert_eq!(viewer.forward(), DVec2::X);
    }

    #[test]
    fn forward_and_backward() {
        let mut v = viewer();
        v.update(&FrameInput {
            dt: 0.5,
            forward: true,
            ..Default::default()
        });
        assert_eq!(v.position, DVec2::new(2.5, 1.5));

        v.update(&FrameInput {
            dt: 0.25,
            backward: true,
            ..Default::default()
        });
        assert_eq!(v.position, DVec2::new(2.0, 1.5));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut v = viewer();
        let before = v.clone();
        v.update(&FrameInput {
            dt: 0.1,
            forward: true,
            backward: true,
            left: true,
            right: true,
        });
        assert_eq!(v, before);
    }

    #[test]
    fn right_turns_positive() {
        let mut v = viewer();
        v.update(&FrameInput {
            dt: 0.5,
            right: true,
            ..Default::default()
        });
        assert_eq!(v.heading(), 45.0);

        v.update(&FrameInput {
            dt: 1.0,
            left: true,
            ..Default::default()
        });
        assert_eq!(v.heading(), -45.0);
    }

    #[test]
    fn rotate_updates_forward() {
        let mut v = viewer();
        for delta in [12.5, -70.0, 400.0, 0.001] {
            v.rotate(delta);
            let expected = vector_from_angle(v.heading());
            assert_abs_diff_eq!(v.forward().x, expected.x, epsilon = 1e-9);
            assert_abs_diff_eq!(v.forward().y, expected.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn rotate_zero_is_idempotent() {
        let mut v = viewer();
        v.rotate(33.0);
        let before = v.clone();
        v.rotate(0.0);
        v.rotate(0.0);
        assert_eq!(v, before);
    }

    #[test]
    fn moves_along_heading() {
        let mut v = viewer();
        v.set_heading(90.0);
        v.update(&FrameInput {
            dt: 1.0,
            forward: true,
            ..Default::default()
        });
        assert_abs_diff_eq!(v.position.x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(v.position.y, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut v = viewer();
        let before = v.clone();
        v.update(&FrameInput {
            dt: 0.016,
            ..Default::default()
        });
        assert_eq!(v, before);
    }
}
