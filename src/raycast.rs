//! Dual-axis grid traversal.
//!
//! Two trackers walk the ray independently: one across the vertical grid lines
//! (`x = k`), one across the horizontal ones (`y = k`). Each inspects the cell it
//! is entering at every crossing and stops on the first occupant or when it
//! leaves the grid. The nearer of the two hits wins; on an exact tie the
//! horizontal-line tracker ([`Axis::Y`]) wins.

use glam::{DVec2, UVec2};

use crate::grid::{OccupancyGrid, OccupantId};
use crate::vector::distance;

/// Which family of grid lines a tracker walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Vertical lines, `x` integral at every crossing.
    X,
    /// Horizontal lines, `y` integral at every crossing.
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub occupant: OccupantId,
    /// Cell holding the occupant.
    pub cell: UVec2,
    /// Boundary crossing where the ray enters `cell` (grid units).
    pub position: DVec2,
    /// Tracker that produced the hit.
    pub axis: Axis,
}

impl RayHit {
    #[inline]
    pub fn distance_from(&self, origin: DVec2) -> f64 {
        distance(origin, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerState {
    Active,
    Hit(RayHit),
    OutOfBounds,
}

/// Stepper over successive crossings of one family of grid lines.
///
/// `along` is the coordinate on the walked axis and is always integral;
/// `across` is the interpolated coordinate on the other axis.
#[derive(Debug, Clone)]
pub struct AxisTracker<'g> {
    grid: &'g OccupancyGrid,
    axis: Axis,
    along: f64,
    across: f64,
    step: f64,
    slope: f64,
    along_limit: f64,
    across_limit: f64,
    state: TrackerState,
}

impl<'g> AxisTracker<'g> {
    /// Returns `None` when `direction` has no component along `axis`.
    pub fn new(
        grid: &'g OccupancyGrid,
        axis: Axis,
        origin: DVec2,
        direction: DVec2,
    ) -> Option<Self> {
        let (o_along, o_across, d_along, d_across, along_limit, across_limit) = match axis {
            Axis::X => (origin.x, origin.y, direction.x, direction.y, grid.width(), grid.height()),
            Axis::Y => (origin.y, origin.x, direction.y, direction.x, grid.height(), grid.width()),
        };

        if d_along == 0.0 || !d_along.is_finite() {
            return None;
        }

        let forward = d_along > 0.0;
        let along = if forward { o_along.ceil() } else { o_along.floor() };
        let step = if forward { 1.0 } else { -1.0 };
        let slope = d_across / d_along;
        let across = o_across + (along - o_along) * slope;

        Some(Self {
            grid,
            axis,
            along,
            across,
            step,
            slope: slope * step,
            along_limit: along_limit as f64,
            across_limit: across_limit as f64,
            state: TrackerState::Active,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Current crossing in grid coordinates.
    pub fn position(&self) -> DVec2 {
        match self.axis {
            Axis::X => DVec2::new(self.along, self.across),
            Axis::Y => DVec2::new(self.across, self.along),
        }
    }

    /// Inspect the current crossing, then move to the next one if nothing was hit.
    ///
    /// Once the tracker has hit or left the grid it keeps returning that state.
    pub fn advance(&mut self) -> TrackerState {
        if self.state != TrackerState::Active {
            return self.state;
        }

        // Moving towards negative coordinates enters the cell behind the line.
        let cell_along = if self.step < 0.0 {
            self.along - 1.0
        } else {
            self.along
        };

        let inside = cell_along >= 0.0
            && self.along < self.along_limit
            && self.across >= 0.0
            && self.across < self.across_limit;
        if !inside {
            self.state = TrackerState::OutOfBounds;
            return self.state;
        }

        let cell_across = self.across.floor();
        let cell = match self.axis {
            Axis::X => UVec2::new(cell_along as u32, cell_across as u32),
            Axis::Y => UVec2::new(cell_across as u32, cell_along as u32),
        };

        if let Some(occupant) = self.grid.occupant_at(cell.x as usize, cell.y as usize) {
            self.state = TrackerState::Hit(RayHit {
                occupant,
                cell,
                position: self.position(),
                axis: self.axis,
            });
            return self.state;
        }

        self.along += self.step;
        self.across += self.slope;
        TrackerState::Active
    }

    /// Drive the tracker until it hits or leaves the grid.
    pub fn finish(mut self) -> Option<RayHit> {
        loop {
            match self.advance() {
                TrackerState::Active => continue,
                TrackerState::Hit(hit) => return Some(hit),
                TrackerState::OutOfBounds => return None,
            }
        }
    }
}

/// Nearest occupant struck by the ray from `origin` along `direction`.
///
/// A zero direction enables neither tracker and yields `None`. The origin cell
/// itself is never reported.
pub fn cast(grid: &OccupancyGrid, origin: DVec2, direction: DVec2) -> Option<RayHit> {
    let mut x_tracker = AxisTracker::new(grid, Axis::X, origin, direction);
    let mut y_tracker = AxisTracker::new(grid, Axis::Y, origin, direction);
    let mut hit_x = None;
    let mut hit_y = None;

    while x_tracker.is_some() || y_tracker.is_some() {
        step_tracker(&mut x_tracker, &mut hit_x);
        step_tracker(&mut y_tracker, &mut hit_y);
    }

    match (hit_x, hit_y) {
        (None, None) => None,
        (Some(hit), None) | (None, Some(hit)) => Some(hit),
        (Some(hx), Some(hy)) => {
            if hx.distance_from(origin) < hy.distance_from(origin) {
                Some(hx)
            } else {
                Some(hy)
            }
        }
    }
}

fn step_tracker(tracker: &mut Option<AxisTracker<'_>>, hit: &mut Option<RayHit>) {
    let Some(active) = tracker.as_mut() else {
        return;
    };
    match active.advance() {
        TrackerState::Active => {}
        TrackerState::Hit(h) => {
            *hit = Some(h);
            *tracker = None;
        }
        TrackerState::OutOfBounds => *tracker = None,
    }
}

impl OccupancyGrid {
    /// See [`cast`].
    #[inline]
    pub fn cast(&self, origin: DVec2, direction: DVec2) -> Option<RayHit> {
        cast(self, origin, direction)
    }
}
