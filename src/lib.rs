pub mod config;
pub mod engine;
pub mod error;
pub mod fov;
pub mod grid;
pub mod map;
pub mod raycast;
pub mod scene;
pub mod vector;
pub mod viewer;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ConfigError, DegenerateVector, GridError, MapError, SceneError};
pub use fov::{FovSampler, RaySample};
pub use grid::{OccupancyGrid, OccupantId};
pub use map::{MapLayout, load_map, parse_map};
pub use raycast::{Axis, AxisTracker, RayHit, TrackerState, cast};
pub use scene::{Appearance, Occupant, Physics, Scene, Shape};
pub use viewer::{FrameInput, Viewer};
