use crate::catalog::SceneCatalog;
use crate::error::RenderError;
use crate::renderer::GraphicsDevice;
use glam::Mat4;
use roomview_input::InputFrame;
use roomview_kernel::{CameraController, CameraPose, Projection, SimulationState};
use std::collections::VecDeque;

/// The window side of the frame loop.
pub trait FrameHost {
    /// Checked once per iteration, before any work for the next frame.
    fn close_requested(&self) -> bool;

    /// Instantaneous key state for this frame.
    fn poll_input(&mut self) -> InputFrame;

    /// Process pending window events after the frame is presented.
    fn poll_events(&mut self);
}

/// Per-frame orchestration: input, pose update, transforms, draws.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    controller: CameraController,
    projection: Projection,
    projection_matrix: Mat4,
}

impl FrameDriver {
    pub fn new(controller: CameraController, projection: Projection) -> Self {
        Self {
            controller,
            projection,
            projection_matrix: projection.matrix(),
        }
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Replace the projection, e.g. after the surface changed size.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.projection_matrix = projection.matrix();
    }

    /// Projection × View for a camera pose.
    pub fn view_projection(&self, camera: &CameraPose) -> Mat4 {
        self.projection_matrix * camera.view_matrix()
    }

    /// Run one frame and return the updated state.
    ///
    /// Every renderable is drawn in catalog order with
    /// Projection × View × Model.
    pub fn frame<D: GraphicsDevice>(
        &self,
        state: &SimulationState,
        input: InputFrame,
        device: &mut D,
        catalog: &SceneCatalog<D>,
    ) -> Result<SimulationState, RenderError> {
        let next = state.step(&self.controller, input);
        let view_projection = self.view_projection(&next.camera);

        device.begin_frame()?;
        for renderable in catalog.iter() {
            device.draw(&renderable.drawable, &(view_projection * renderable.model))?;
        }
        device.end_frame()?;

        tracing::debug!(frame = next.frame, draws = catalog.len(), "frame submitted");
        Ok(next)
    }

    /// Loop until the host asks to close. Returns the final state.
    pub fn run<H: FrameHost, D: GraphicsDevice>(
        &self,
        host: &mut H,
        device: &mut D,
        catalog: &SceneCatalog<D>,
        mut state: SimulationState,
    ) -> Result<SimulationState, RenderError> {
        while !host.close_requested() {
            let input = host.poll_input();
            state = self.frame(&state, input, device, catalog)?;
            host.poll_events();
        }
        Ok(state)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(CameraController::default(), Projection::default())
    }
}

/// Host that plays back recorded input and closes when it runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    frames: VecDeque<InputFrame>,
    events_polled: u64,
}

impl ScriptedHost {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            events_polled: 0,
        }
    }

    pub fn events_polled(&self) -> u64 {
        self.events_polled
    }
}

impl FrameHost for ScriptedHost {
    fn close_requested(&self) -> bool {
        self.frames.is_empty()
    }

    fn poll_input(&mut self) -> InputFrame {
        self.frames.pop_front().unwrap_or_default()
    }

    fn poll_events(&mut self) {
        self.events_polled += 1;
    }
}
