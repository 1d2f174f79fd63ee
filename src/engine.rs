use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};

use crate::config::EngineConfig;
use crate::error::{ConfigError, SceneError};
use crate::fov::{FovSampler, RaySample};
use crate::scene::Scene;
use crate::viewer::FrameInput;

/// Named scenes plus the one currently being played.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    sampler: FovSampler,
    scenes: HashMap<String, Scene>,
    active: Option<String>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = FovSampler::from_settings(&config.view)?;
        Ok(Self {
            config,
            sampler,
            scenes: HashMap::new(),
            active: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sampler(&self) -> &FovSampler {
        &self.sampler
    }

    /// Register a scene under its own name. The first scene added becomes active.
    pub fn add_scene(&mut self, scene: Scene) -> Result<(), SceneError> {
        let name = scene.name().to_string();
        if self.scenes.contains_key(&name) {
            return Err(SceneError::DuplicateScene(name));
        }
        debug!("registered scene {name:?}");
        if self.active.is_none() {
            self.active = Some(name.clone());
        }
        self.scenes.insert(name, scene);
        Ok(())
    }

    /// Load a `.wad` map as a new scene named `name`.
    pub fn load_scene(&mut self, name: &str, path: impl AsRef<Path>) -> Result<(), SceneError> {
        if self.scenes.contains_key(name) {
            return Err(SceneError::DuplicateScene(name.to_string()));
        }
        let scene = Scene::load(name, path, &self.config)?;
        self.add_scene(scene)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::UnknownScene(name.to_string()));
        }
        info!("switching to scene {name:?}");
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn active(&self) -> Option<&Scene> {
        self.active.as_ref().and_then(|name| self.scenes.get(name))
    }

    pub fn active_mut(&mut self) -> Option<&mut Scene> {
        let name = self.active.as_ref()?;
        self.scenes.get_mut(name)
    }

    /// Run one frame on the active scene: move the viewer, then sample its view.
    pub fn frame(&mut self, input: &FrameInput) -> Result<Vec<RaySample>, SceneError> {
        let sampler = self.sampler;
        let scene = self.active_mut().ok_or(SceneError::NoActiveScene)?;
        scene.tick(input);
        Ok(scene.view(&sampler))
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::map::parse_map;
    use crate::viewer::Viewer;

    fn scene(name: &str) -> Scene {
        let layout = parse_map("4\n1111\n1001\n1001\n1111\n").unwrap();
        Scene::from_layout(name, &layout, Viewer::new(DVec2::splat(1.5), 0.0, 1.0, 90.0)).unwrap()
    }

    #[test]
    fn frame_without_scene_fails() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        assert!(matches!(
            engine.frame(&FrameInput::default()),
            Err(SceneError::NoActiveScene)
        ));
    }

    #[test]
    fn first_scene_becomes_active() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.add_scene(scene("a")).unwrap();
        engine.add_scene(scene("b")).unwrap();
        assert_eq!(engine.active().map(Scene::name), Some("a"));

        engine.set_active("b").unwrap();
        assert_eq!(engine.active().map(Scene::name), Some("b"));
        assert!(engine.scene("a").is_some());
    }

    #[test]
    fn names_are_unique() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.add_scene(scene("a")).unwrap();
        assert!(matches!(
            engine.add_scene(scene("a")),
            Err(SceneError::DuplicateScene(name)) if name == "a"
        ));
        assert!(matches!(
            engine.load_scene("a", "unused.wad"),
            Err(SceneError::DuplicateScene(_))
        ));
        assert!(matches!(
            engine.set_active("missing"),
            Err(SceneError::UnknownScene(_))
        ));
        assert_eq!(engine.active().map(Scene::name), Some("a"));
    }

    #[test]
    fn frame_moves_then_samples() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.add_scene(scene("a")).unwrap();
        let samples = engine
            .frame(&FrameInput {
                dt: 0.5,
                forward: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(samples.len(), engine.config().view.ray_count);
        assert_eq!(engine.active().unwrap().viewer().position, DVec2::new(2.0, 1.5));
        assert!(samples.iter().all(|s| s.hit.is_some()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.view.ray_count = 0;
        assert!(Engine::new(config).is_err());
    }
}
