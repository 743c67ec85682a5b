use glam::{Mat4, Vec3};
use roomview_input::InputFrame;
use serde::{Deserialize, Serialize};

/// Planar first-person camera pose.
///
/// Only yaw is free. `forward` is kept in sync with `yaw_degrees` by
/// [`CameraPose::with_yaw`]; construct poses through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub yaw_degrees: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::with_yaw(Vec3::new(0.5, 0.4, 0.5), -90.0)
    }
}

impl CameraPose {
    pub fn with_yaw(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            forward: forward_from_yaw(yaw_degrees),
            up: Vec3::Y,
            yaw_degrees,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }
}

/// Unit facing direction in the horizontal plane.
pub fn forward_from_yaw(yaw_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(yaw.cos(), 0.0, yaw.sin()).normalize()
}

/// Integrates per-frame movement commands into a new pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraController {
    /// Distance moved per frame while a move key is held.
    pub speed: f32,
    /// Yaw change in degrees per frame while a turn key is held.
    pub turn_step: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            speed: 0.05,
            turn_step: 3.0,
        }
    }
}

impl CameraController {
    /// Apply one frame of input.
    ///
    /// Translation uses the facing direction at the start of the frame; the
    /// new facing direction is derived from the updated yaw afterwards.
    pub fn apply(&self, pose: &CameraPose, input: InputFrame) -> CameraPose {
        let mut position = pose.position;
        if input.move_forward {
            position += pose.forward * self.speed;
        }
        if input.move_backward {
            position -= pose.forward * self.speed;
        }

        let mut yaw = pose.yaw_degrees;
        if input.turn_left {
            yaw -= self.turn_step;
        }
        if input.turn_right {
            yaw += self.turn_step;
        }

        CameraPose {
            position,
            forward: forward_from_yaw(yaw),
            up: pose.up,
            yaw_degrees: yaw,
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 1280.0 / 720.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_input::Action;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_pose_faces_negative_z() {
        let pose = CameraPose::default();
        assert!(pose.forward.abs_diff_eq(Vec3::NEG_Z, EPS));
        assert_eq!(pose.up, Vec3::Y);
        assert_eq!(pose.position, Vec3::new(0.5, 0.4, 0.5));
    }

    #[test]
    fn turn_right_rotates_clockwise_by_one_step() {
        let controller = CameraController::default();
        let pose = CameraPose::default();
        let turned = controller.apply(&pose, InputFrame::from_actions([Action::TurnRight]));

        let step = controller.turn_step.to_radians();
        assert_eq!(turned.yaw_degrees, -87.0);
        assert!((turned.forward.length() - 1.0).abs() < EPS);
        assert_eq!(turned.forward.y, 0.0);
        // Seen from above (+Y), clockwise from -Z swings toward +X.
        assert!(turned.forward.x > 0.0);
        assert!(turned.forward.abs_diff_eq(Vec3::new(step.sin(), 0.0, -step.cos()), EPS));
    }

    #[test]
    fn turn_left_decreases_yaw() {
        let controller = CameraController::default();
        let turned = controller.apply(
            &CameraPose::default(),
            InputFrame::from_actions([Action::TurnLeft]),
        );
        assert_eq!(turned.yaw_degrees, -93.0);
        assert!(turned.forward.x < 0.0);
    }

    #[test]
    fn forward_and_backward_cancel() {
        let controller = CameraController::default();
        let pose = CameraPose::default();
        let moved = controller.apply(
            &pose,
            InputFrame::from_actions([Action::MoveForward, Action::MoveBackward]),
        );
        assert!(moved.position.abs_diff_eq(pose.position, EPS));
    }

    #[test]
    fn move_forward_follows_facing() {
        let controller = CameraController::default();
        let pose = CameraPose::default();
        let moved = controller.apply(&pose, InputFrame::from_actions([Action::MoveForward]));
        let expected = pose.position + Vec3::NEG_Z * controller.speed;
        assert!(moved.position.abs_diff_eq(expected, EPS));
        assert_eq!(moved.yaw_degrees, pose.yaw_degrees);
    }

    #[test]
    fn translation_uses_facing_from_frame_start() {
        let controller = CameraController::default();
        let pose = CameraPose::default();
        let moved = controller.apply(
            &pose,
            InputFrame::from_actions([Action::MoveForward, Action::TurnRight]),
        );
        assert!(moved.position.abs_diff_eq(pose.position + pose.forward * 0.05, EPS));
        assert!(moved.forward.abs_diff_eq(forward_from_yaw(-87.0), EPS));
    }

    #[test]
    fn forward_stays_in_sync_with_yaw() {
        let controller = CameraController::default();
        let mut pose = CameraPose::default();
        for _ in 0..500 {
            pose = controller.apply(&pose, InputFrame::from_actions([Action::TurnRight]));
        }
        assert!(pose.forward.abs_diff_eq(forward_from_yaw(pose.yaw_degrees), EPS));
        assert!((pose.forward.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn idle_input_keeps_pose() {
        let controller = CameraController::default();
        let pose = CameraPose::default();
        assert_eq!(controller.apply(&pose, InputFrame::default()), pose);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let pose = CameraPose::default();
        let ahead = pose.view_matrix().transform_point3(pose.position + pose.forward);
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn projection_is_finite() {
        let m = Projection::default().matrix();
        assert!(m.is_finite());
        let wide = Projection::for_viewport(1920, 1080);
        assert!((wide.aspect - 16.0 / 9.0).abs() < EPS);
    }
}
