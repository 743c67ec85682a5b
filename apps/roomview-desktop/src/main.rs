use anyhow::{Context, Result};
use clap::Parser;
use roomview_assets::{ImageTextureProvider, SceneManifest};
use roomview_input::{Action, InputFrame};
use roomview_kernel::{CameraController, Projection, SimulationState};
use roomview_render::{FrameDriver, ProgramCompiler, SceneCatalog};
use roomview_render_wgpu::WgpuDevice;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WINDOW_TITLE: &str = "Room Viewer";
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

#[derive(Parser)]
#[command(name = "roomview-desktop", about = "Walk through the textured room scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Asset root; manifest paths resolve against it
    #[arg(long, default_value = "./assets")]
    assets: PathBuf,

    /// Scene manifest (JSON). The built-in room scene is used when absent.
    #[arg(long)]
    manifest: Option<PathBuf>,
}

/// Arrow keys drive the camera.
fn action_for_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::ArrowUp => Some(Action::MoveForward),
        KeyCode::ArrowDown => Some(Action::MoveBackward),
        KeyCode::ArrowLeft => Some(Action::TurnLeft),
        KeyCode::ArrowRight => Some(Action::TurnRight),
        _ => None,
    }
}

/// Everything that exists once the window and device are up.
struct Scene {
    window: Arc<Window>,
    device: WgpuDevice,
    catalog: SceneCatalog<WgpuDevice>,
    driver: FrameDriver,
    state: SimulationState,
}

impl Scene {
    fn create(event_loop: &ActiveEventLoop, manifest: &SceneManifest) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let mut device = WgpuDevice::new(window.clone(), size.width, size.height)
            .context("failed to initialize graphics")?;

        let program = ProgramCompiler::new()
            .compile(&mut device, &manifest.program)
            .context("failed to build shader program")?;

        let (catalog, report) = SceneCatalog::load(
            &mut device,
            &manifest.entries,
            &program,
            &ImageTextureProvider,
        );
        if !report.failed.is_empty() {
            tracing::warn!(
                "{} of {} scene entries failed to load",
                report.failed.len(),
                manifest.entries.len()
            );
        }

        let driver = FrameDriver::new(
            CameraController::default(),
            Projection::for_viewport(size.width, size.height),
        );

        Ok(Self {
            window,
            device,
            catalog,
            driver,
            state: SimulationState::default(),
        })
    }
}

struct Viewer {
    manifest: SceneManifest,
    scene: Option<Scene>,
    held: InputFrame,
    fatal: Option<anyhow::Error>,
}

impl Viewer {
    fn new(manifest: SceneManifest) -> Self {
        Self {
            manifest,
            scene: None,
            held: InputFrame::default(),
            fatal: None,
        }
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_some() {
            return;
        }
        match Scene::create(event_loop, &self.manifest) {
            Ok(scene) => {
                tracing::info!("{} renderables ready", scene.catalog.len());
                scene.window.request_redraw();
                self.scene = Some(scene);
            }
            Err(err) => self.abort(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(scene) = &mut self.scene {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    scene.device.resize(new_size.width, new_size.height);
                    scene
                        .driver
                        .set_projection(Projection::for_viewport(new_size.width, new_size.height));
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if let Some(action) = action_for_key(key) {
                    self.held.set(action, key_state == ElementState::Pressed);
                }
            }
            WindowEvent::Focused(false) => {
                self.held = InputFrame::default();
            }
            WindowEvent::RedrawRequested => {
                let Some(scene) = &mut self.scene else {
                    return;
                };
                let result =
                    scene
                        .driver
                        .frame(&scene.state, self.held, &mut scene.device, &scene.catalog);
                match result {
                    Ok(next) => {
                        scene.state = next;
                        scene.window.request_redraw();
                    }
                    Err(err) => self.abort(event_loop, anyhow::Error::new(err).context("frame failed")),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = &self.scene {
            scene.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("roomview-desktop starting");

    let manifest = match &cli.manifest {
        Some(path) => SceneManifest::load(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?,
        None => SceneManifest::room(),
    };
    let manifest = manifest.resolve(&cli.assets);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = Viewer::new(manifest);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(err) => Err(err),
        None => {
            if let Some(scene) = &app.scene {
                tracing::info!("closed after {} frames", scene.state.frame);
            }
            Ok(())
        }
    }
}
