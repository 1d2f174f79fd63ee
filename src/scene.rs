//! A loaded level: grid, occupant registry and viewer.

use std::collections::HashMap;
use std::path::Path;

use glam::{DVec2, UVec2};
use log::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::error::{GridError, SceneError};
use crate::fov::{FovSampler, RaySample};
use crate::grid::{OccupancyGrid, OccupantId};
use crate::map::{MapLayout, load_map};
use crate::raycast::{RayHit, cast};
use crate::viewer::{FrameInput, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rectangle,
    Circle,
}

/// How an occupant is drawn by a top-down renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub shape: Shape,
    pub color: [u8; 3],
}

impl Appearance {
    pub fn rectangle(color: [u8; 3]) -> Self {
        Self {
            shape: Shape::Rectangle,
            color,
        }
    }

    pub fn circle(color: [u8; 3]) -> Self {
        Self {
            shape: Shape::Circle,
            color,
        }
    }

    /// Colour for a map digit.
    pub fn for_digit(digit: u8) -> Self {
        const PALETTE: [[u8; 3]; 9] = [
            [255, 0, 0],
            [200, 200, 200],
            [180, 180, 250],
            [250, 180, 180],
            [180, 250, 180],
            [250, 220, 120],
            [120, 220, 250],
            [220, 120, 250],
            [140, 140, 140],
        ];
        let idx = (digit.max(1) as usize - 1) % PALETTE.len();
        Self::rectangle(PALETTE[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Physics {
    /// Static, immovable body.
    Static,
}

/// Anything that occupies a grid cell and blocks rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupant {
    pub name: String,
    pub cell: UVec2,
    /// Map digit the occupant was created from, 0 when spawned by hand.
    pub kind: u8,
    pub appearance: Option<Appearance>,
    pub physics: Option<Physics>,
}

impl Occupant {
    pub fn new(name: impl Into<String>, cell: UVec2) -> Self {
        Self {
            name: name.into(),
            cell,
            kind: 0,
            appearance: None,
            physics: None,
        }
    }

    pub fn with_kind(mut self, kind: u8) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = Some(physics);
        self
    }
}

/// Grid plus registry. Every registered occupant sits in exactly one cell and
/// every occupied cell refers to a registered occupant.
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    grid: OccupancyGrid,
    occupants: HashMap<OccupantId, Occupant>,
    by_name: HashMap<String, OccupantId>,
    next_id: u32,
    viewer: Viewer,
}

impl Scene {
    pub fn new(name: impl Into<String>, width: u32, height: u32, viewer: Viewer) -> Self {
        Self {
            name: name.into(),
            grid: OccupancyGrid::new(width, height),
            occupants: HashMap::new(),
            by_name: HashMap::new(),
            next_id: 0,
            viewer,
        }
    }

    /// Build a scene from a parsed map: one static occupant named `"x,y"` per
    /// non-zero cell.
    pub fn from_layout(
        name: impl Into<String>,
        layout: &MapLayout,
        viewer: Viewer,
    ) -> Result<Self, SceneError> {
        let mut scene = Self::new(name, layout.width(), layout.height(), viewer);
        for (cell, digit) in layout.blocking() {
            let occupant = Occupant::new(format!("{},{}", cell.x, cell.y), cell)
                .with_kind(digit)
                .with_appearance(Appearance::for_digit(digit))
                .with_physics(Physics::Static);
            scene.spawn(occupant)?;
        }
        Ok(scene)
    }

    /// Read a `.wad` map and place the viewer at the configured spawn cell.
    pub fn load(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        config: &EngineConfig,
    ) -> Result<Self, SceneError> {
        let name = name.into();
        let path = path.as_ref();
        let layout = load_map(path)?;
        let spawn = config.viewer.spawn;
        if spawn.x >= layout.width() || spawn.y >= layout.height() {
            return Err(GridError::OutOfBounds {
                x: spawn.x,
                y: spawn.y,
                width: layout.width(),
                height: layout.height(),
            }
            .into());
        }
        let scene = Self::from_layout(name, &layout, Viewer::spawn(&config.viewer))?;
        info!(
            "loaded scene {:?} from {}: {}x{} cells, {} occupants",
            scene.name,
            path.display(),
            scene.grid.width(),
            scene.grid.height(),
            scene.occupants.len()
        );
        Ok(scene)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// Register `occupant` and place it in its cell.
    ///
    /// Fails without side effects if the name is taken, the cell is outside the
    /// grid, or the cell is already occupied.
    pub fn spawn(&mut self, occupant: Occupant) -> Result<OccupantId, SceneError> {
        if self.by_name.contains_key(&occupant.name) {
            return Err(SceneError::DuplicateOccupant(occupant.name));
        }
        let id = OccupantId(self.next_id);
        self.grid.set(occupant.cell.x, occupant.cell.y, id)?;
        self.next_id += 1;

        debug!(
            "scene {:?}: spawned {:?} {} at ({}, {})",
            self.name, occupant.name, id, occupant.cell.x, occupant.cell.y
        );
        self.by_name.insert(occupant.name.clone(), id);
        self.occupants.insert(id, occupant);
        Ok(id)
    }

    /// Unregister an occupant and clear its cell.
    pub fn remove(&mut self, id: OccupantId) -> Option<Occupant> {
        let occupant = self.occupants.remove(&id)?;
        self.by_name.remove(&occupant.name);
        if let Err(e) = self.grid.clear(occupant.cell.x, occupant.cell.y) {
            warn!("scene {:?}: registry out of sync with grid: {e}", self.name);
        }
        debug!("scene {:?}: removed {:?} {}", self.name, occupant.name, id);
        Some(occupant)
    }

    pub fn occupant(&self, id: OccupantId) -> Option<&Occupant> {
        self.occupants.get(&id)
    }

    pub fn find(&self, name: &str) -> Option<(OccupantId, &Occupant)> {
        let id = *self.by_name.get(name)?;
        self.occupants.get(&id).map(|occupant| (id, occupant))
    }

    pub fn occupants(&self) -> impl Iterator<Item = (OccupantId, &Occupant)> {
        self.occupants.iter().map(|(&id, occupant)| (id, occupant))
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// Advance the viewer by one frame.
    pub fn tick(&mut self, input: &FrameInput) {
        self.viewer.update(input);
    }

    /// Cast a single ray from the viewer.
    pub fn cast_from_viewer(&self, direction: DVec2) -> Option<RayHit> {
        cast(&self.grid, self.viewer.position, direction)
    }

    /// Sample the viewer's field of view against the current grid.
    pub fn view(&self, sampler: &FovSampler) -> Vec<RaySample> {
        let samples = sampler.sample_par(&self.grid, self.viewer.position, self.viewer.heading());
        trace!(
            "scene {:?}: {} rays, {} hits",
            self.name,
            samples.len(),
            samples.iter().filter(|s| s.hit.is_some()).count()
        );
        samples
    }
}
