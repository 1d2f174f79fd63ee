use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use grid_raycaster::{Engine, EngineConfig, FrameInput};

mod renderer;

/// Top-down grid raycaster viewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map to load (.wad)
    #[arg(short, long)]
    map: PathBuf,

    /// Engine configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field of view in degrees, overrides the configuration
    #[arg(long)]
    fov: Option<f64>,

    /// Rays per frame, overrides the configuration
    #[arg(long)]
    rays: Option<usize>,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    engine: Engine,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Input and timing
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    max_dt: Duration,
}

impl App {
    fn new(engine: Engine) -> Self {
        let max_dt = Duration::from_secs_f64(engine.config().window.max_frame_dt);
        Self {
            window: None,
            surface: None,
            engine,
            frame_counter: 0,
            last_fps_print: Instant::now(),
            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            max_dt,
        }
    }

    /// Snapshot of this frame's elapsed time and arrow keys.
    fn frame_input(&mut self) -> FrameInput {
        // Cap dt to avoid huge jumps if the app was paused
        let now = Instant::now();
        let mut dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        if dt > self.max_dt {
            warn!("frame took {:?}, clamping to {:?}", dt, self.max_dt);
            dt = self.max_dt;
        }

        FrameInput {
            dt: dt.as_secs_f64(),
            forward: self.keys_down.contains(&KeyCode::ArrowUp),
            backward: self.keys_down.contains(&KeyCode::ArrowDown),
            left: self.keys_down.contains(&KeyCode::ArrowLeft),
            right: self.keys_down.contains(&KeyCode::ArrowRight),
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        let input = self.frame_input();
        let samples = self.engine.frame(&input)?;

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };

        surface
            .resize(dw, dh)
            .map_err(|e| anyhow::anyhow!("surface resize: {e}"))?;

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("buffer_mut: {e}"))?;
        if let Some(scene) = self.engine.active() {
            renderer::render_frame(
                &mut buf,
                dw.get() as usize,
                dh.get() as usize,
                scene,
                &samples,
            );
        }
        buf.present()
            .map_err(|e| anyhow::anyhow!("present: {e}"))?;

        // Print FPS
        self.frame_counter += 1;
        let now = Instant::now();
        if now.duration_since(self.last_fps_print).as_secs_f32() >= 1.0 {
            let fps =
                self.frame_counter as f32 / now.duration_since(self.last_fps_print).as_secs_f32();
            info!("FPS: {:.1}", fps);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let settings = &self.engine.config().window;
        let attributes = Window::default_attributes()
            .with_title("Grid Raycaster")
            .with_inner_size(LogicalSize::new(settings.width as f64, settings.height as f64));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                error!("cannot create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                error!("cannot create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        }

        self.last_tick = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    use winit::event::ElementState;
                    match state {
                        ElementState::Pressed if code == KeyCode::Escape => event_loop.exit(),
                        ElementState::Pressed => {
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    error!("frame failed: {e:#}");
                    event_loop.exit();
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(fov) = args.fov {
        config.view.fov = fov;
    }
    if let Some(rays) = args.rays {
        config.view.ray_count = rays;
    }

    let mut engine = Engine::new(config)?;
    let name = args
        .map
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("map")
        .to_string();
    engine
        .load_scene(&name, &args.map)
        .with_context(|| format!("loading map {}", args.map.display()))?;

    let event_loop = EventLoop::new()?;
    // Redraws are requested continuously from about_to_wait.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(engine);
    event_loop.run_app(&mut app)?;
    Ok(())
}
