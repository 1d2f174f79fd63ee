//! Field-of-view sampling: a fan of rays across the viewer's heading.

use glam::DVec2;
use rayon::prelude::*;

use crate::config::ViewSettings;
use crate::error::ConfigError;
use crate::grid::OccupancyGrid;
use crate::raycast::{RayHit, cast};
use crate::vector::vector_from_angle;

/// One ray of the fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySample {
    /// Absolute ray angle in degrees.
    pub angle: f64,
    pub hit: Option<RayHit>,
    /// Distance from the origin to `hit.position`.
    pub distance: Option<f64>,
}

/// Casts `ray_count` rays evenly across `fov` degrees, left edge first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovSampler {
    fov: f64,
    ray_count: usize,
}

impl FovSampler {
    /// `fov` must lie in `(0, 360]` degrees and `ray_count` must be at least 1.
    pub fn new(fov: f64, ray_count: usize) -> Result<Self, ConfigError> {
        if !(fov > 0.0 && fov <= 360.0) {
            return Err(ConfigError::Invalid(format!(
                "fov must be in (0, 360] degrees, got {fov}"
            )));
        }
        if ray_count == 0 {
            return Err(ConfigError::Invalid("ray_count must be at least 1".to_string()));
        }
        Ok(Self { fov, ray_count })
    }

    pub fn from_settings(settings: &ViewSettings) -> Result<Self, ConfigError> {
        Self::new(settings.fov, settings.ray_count)
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Angle of ray `i` for a viewer facing `heading`.
    #[inline]
    pub fn angle(&self, heading: f64, i: usize) -> f64 {
        heading - self.fov / 2.0 + i as f64 * (self.fov / self.ray_count as f64)
    }

    /// Lazily cast the fan. The iterator can be recreated at will and holds no state
    /// beyond the ray index.
    pub fn rays<'a>(
        &'a self,
        grid: &'a OccupancyGrid,
        origin: DVec2,
        heading: f64,
    ) -> impl ExactSizeIterator<Item = RaySample> + 'a {
        (0..self.ray_count).map(move |i| self.sample_ray(grid, origin, heading, i))
    }

    pub fn sample(&self, grid: &OccupancyGrid, origin: DVec2, heading: f64) -> Vec<RaySample> {
        self.rays(grid, origin, heading).collect()
    }

    /// Same result as [`FovSampler::sample`], with rays cast on the rayon pool.
    pub fn sample_par(&self, grid: &OccupancyGrid, origin: DVec2, heading: f64) -> Vec<RaySample> {
        (0..self.ray_count)
            .into_par_iter()
            .map(|i| self.sample_ray(grid, origin, heading, i))
            .collect()
    }

    fn sample_ray(&self, grid: &OccupancyGrid, origin: DVec2, heading: f64, i: usize) -> RaySample {
        let angle = self.angle(heading, i);
        let hit = cast(grid, origin, vector_from_angle(angle));
        RaySample {
            angle,
            hit,
            distance: hit.map(|h| h.distance_from(origin)),
        }
    }
}
