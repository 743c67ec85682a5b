use crate::camera::{CameraController, CameraPose};
use roomview_input::InputFrame;
use serde::{Deserialize, Serialize};

/// Everything that changes from one frame to the next.
///
/// Owned by the frame loop and passed by reference; there is no ambient
/// camera state. Stepping the same state with the same input always yields
/// the same result, so a recorded input sequence replays exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Number of frames stepped so far.
    pub frame: u64,
    pub camera: CameraPose,
}

impl SimulationState {
    pub fn new(camera: CameraPose) -> Self {
        Self { frame: 0, camera }
    }

    /// Advance one frame.
    pub fn step(&self, controller: &CameraController, input: InputFrame) -> Self {
        let next = Self {
            frame: self.frame + 1,
            camera: controller.apply(&self.camera, input),
        };
        tracing::trace!(
            frame = next.frame,
            yaw = next.camera.yaw_degrees,
            "camera at ({:.3}, {:.3}, {:.3})",
            next.camera.position.x,
            next.camera.position.y,
            next.camera.position.z
        );
        next
    }

    /// Fold a recorded input sequence through [`SimulationState::step`].
    pub fn replay(
        &self,
        controller: &CameraController,
        inputs: impl IntoIterator<Item = InputFrame>,
    ) -> Self {
        inputs
            .into_iter()
            .fold(*self, |state, input| state.step(controller, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use roomview_input::{Action, InputScript};

    #[test]
    fn step_advances_frame_counter() {
        let state = SimulationState::default();
        let next = state.step(&CameraController::default(), InputFrame::default());
        assert_eq!(next.frame, 1);
        assert_eq!(next.camera, state.camera);
    }

    #[test]
    fn step_does_not_touch_previous_state() {
        let state = SimulationState::default();
        let before = state;
        let _ = state.step(
            &CameraController::default(),
            InputFrame::from_actions([Action::MoveForward]),
        );
        assert_eq!(state, before);
    }

    #[test]
    fn replay_is_deterministic() {
        let controller = CameraController::default();
        let script: InputScript = "f*20 r*10 fr*15 b*5 l*7 .".parse().unwrap();

        let a = SimulationState::default().replay(&controller, script.clone());
        let b = SimulationState::default().replay(&controller, script.clone());
        assert_eq!(a, b);
        assert_eq!(a.frame, script.len() as u64);
    }

    #[test]
    fn replay_matches_manual_stepping() {
        let controller = CameraController::default();
        let script: InputScript = "f f r fr l b".parse().unwrap();

        let mut manual = SimulationState::default();
        for input in script.frames() {
            manual = manual.step(&controller, *input);
        }
        assert_eq!(SimulationState::default().replay(&controller, script), manual);
    }

    #[test]
    fn full_turn_returns_to_start_heading() {
        let controller = CameraController::default();
        let script: InputScript = "r*120".parse().unwrap();
        let state = SimulationState::default().replay(&controller, script);
        assert!((state.camera.yaw_degrees - 270.0).abs() < 1e-3);
        assert!(state.camera.forward.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }
}
