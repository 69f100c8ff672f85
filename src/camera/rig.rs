use nalgebra_glm as glm;

use crate::camera::intent::Intent;
use crate::camera::pose::{CameraPose, INITIAL_CAMERA_Z, ViewContext};
use crate::camera::raycast;

pub const PAN_X_GAIN: f32 = 0.09;
pub const PAN_Y_GAIN: f32 = 0.09;
pub const WHEEL_PAN_GAIN: f32 = 0.06;
pub const ZOOM_GAIN: f32 = 0.5;
/// Fraction of the remaining distance to the target covered each frame.
/// Must stay inside (0, 1): the pose approaches exponentially, no overshoot.
pub const DAMPING: f32 = 0.1;
/// Pushes the camera back along +z when focusing so the focused image is not
/// clipped by the near plane.
pub const FOCUS_OFFSET: f32 = 6.0;

/// The navigation state machine. Owns the camera's *desired* destination and
/// the modifier/drag state; the actual pose chases the destination through
/// `tick`. Host-agnostic: all input arrives as `Intent` values.
pub struct CameraRig {
    target: glm::Vec3,
    zoom_modifier: bool,
    dragging: bool,
    last_pointer: Option<(f32, f32)>,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            target: glm::vec3(0.0, 0.0, INITIAL_CAMERA_Z),
            zoom_modifier: false,
            dragging: false,
            last_pointer: None,
        }
    }

    pub fn target(&self) -> glm::Vec3 {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn zoom_modifier_active(&self) -> bool {
        self.zoom_modifier
    }

    pub fn handle_intent(&mut self, intent: Intent, view: &ViewContext) {
        match intent {
            Intent::Pan { dx, dy } => self.pan(dx, dy),
            Intent::ZoomModifier { active } => self.zoom_modifier = active,
            Intent::DragStart { x, y } => {
                self.dragging = true;
                self.last_pointer = Some((x, y));
            }
            Intent::DragMove { x, y } => {
                if !self.dragging {
                    return;
                }
                if let Some((last_x, last_y)) = self.last_pointer {
                    self.pan(x - last_x, y - last_y);
                }
                self.last_pointer = Some((x, y));
            }
            Intent::DragEnd => {
                self.dragging = false;
                self.last_pointer = None;
            }
            Intent::WheelZoom {
                delta_y,
                pointer_ndc,
            } => {
                if self.zoom_modifier {
                    let Some((ndc_x, ndc_y)) = pointer_ndc else {
                        // Viewport unknown; skip the zoom for this event.
                        return;
                    };
                    let ray = raycast::compute_ray(ndc_x, ndc_y, view.eye, view.aspect);
                    let point = raycast::point_at_distance(&ray, raycast::REFERENCE_DISTANCE);
                    self.zoom_toward(view.eye, point, delta_y);
                } else {
                    self.target.y += delta_y * WHEEL_PAN_GAIN;
                }
            }
        }
    }

    /// Return to the initial view: centered on the grid, the starting
    /// distance out.
    pub fn reset(&mut self) {
        self.target = glm::vec3(0.0, 0.0, INITIAL_CAMERA_Z);
    }

    /// Aim the camera at a world position, offset back along +z. Successive
    /// calls overwrite each other; there is no queue.
    pub fn focus_on(&mut self, x: f32, y: f32, z: f32) {
        self.target = glm::vec3(x, y, z + FOCUS_OFFSET);
    }

    /// Per-frame integration: move the pose a fixed fraction of the remaining
    /// distance toward the target. The only place the pose is mutated.
    pub fn tick(&self, pose: &mut CameraPose) {
        pose.position += (self.target - pose.position) * DAMPING;
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        self.target.x -= dx * PAN_X_GAIN;
        self.target.y += dy * PAN_Y_GAIN;
    }

    /// Advance the target from `eye` toward `point`, scroll-up meaning
    /// toward. Degenerate directions (eye already at the point) are dropped.
    fn zoom_toward(&mut self, eye: glm::Vec3, point: glm::Vec3, delta_y: f32) {
        let to_point = point - eye;
        let len = glm::length(&to_point);
        if len <= f32::EPSILON {
            return;
        }
        let dir = to_point / len;
        let zoom_factor = -delta_y * ZOOM_GAIN;
        self.target += dir * zoom_factor;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewContext {
        ViewContext {
            eye: glm::vec3(0.0, 0.0, INITIAL_CAMERA_Z),
            aspect: 16.0 / 9.0,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn pan_intents_never_touch_z() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::Pan { dx: 12.0, dy: -7.0 }, &v);
        rig.handle_intent(Intent::DragStart { x: 100.0, y: 100.0 }, &v);
        rig.handle_intent(Intent::DragMove { x: 60.0, y: 180.0 }, &v);
        rig.handle_intent(Intent::DragMove { x: 20.0, y: 30.0 }, &v);
        rig.handle_intent(Intent::DragEnd, &v);
        assert_eq!(rig.target().z, INITIAL_CAMERA_Z);
    }

    #[test]
    fn drag_delta_applies_reference_gains() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::DragStart { x: 100.0, y: 100.0 }, &v);
        rig.handle_intent(Intent::DragMove { x: 110.0, y: 95.0 }, &v);
        // (dx, dy) = (10, -5): x -= 10 * 0.09, y += -5 * 0.09
        assert!(approx(rig.target().x, -10.0 * PAN_X_GAIN));
        assert!(approx(rig.target().y, -5.0 * PAN_Y_GAIN));
    }

    #[test]
    fn drag_move_without_drag_is_a_noop() {
        let mut rig = CameraRig::new();
        let before = rig.target();
        rig.handle_intent(Intent::DragMove { x: 55.0, y: 44.0 }, &view());
        assert_eq!(rig.target(), before);
    }

    #[test]
    fn drag_end_forgets_the_pointer() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::DragStart { x: 10.0, y: 10.0 }, &v);
        rig.handle_intent(Intent::DragEnd, &v);
        let before = rig.target();
        // A stray move after the drag ended must not pan.
        rig.handle_intent(Intent::DragMove { x: 500.0, y: 500.0 }, &v);
        assert_eq!(rig.target(), before);
    }

    #[test]
    fn wheel_without_modifier_pans_vertically() {
        let mut rig = CameraRig::new();
        rig.handle_intent(
            Intent::WheelZoom {
                delta_y: -100.0,
                pointer_ndc: Some((0.3, -0.2)),
            },
            &view(),
        );
        assert!(approx(rig.target().y, -100.0 * WHEEL_PAN_GAIN));
        assert_eq!(rig.target().x, 0.0);
        assert_eq!(rig.target().z, INITIAL_CAMERA_Z);
    }

    #[test]
    fn zoom_toward_cursor_moves_target_toward_point() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::ZoomModifier { active: true }, &v);
        // Pointer at canvas center: the ray runs straight down -z, the
        // reference point is the world origin. Scroll up by 20.
        rig.handle_intent(
            Intent::WheelZoom {
                delta_y: -20.0,
                pointer_ndc: Some((0.0, 0.0)),
            },
            &v,
        );
        // zoom_factor = -(-20) * 0.5 = 10 along (0, 0, -1): toward the cursor.
        assert!(approx(rig.target().x, 0.0));
        assert!(approx(rig.target().y, 0.0));
        assert!(approx(rig.target().z, INITIAL_CAMERA_Z - 10.0));
    }

    #[test]
    fn zoom_off_center_gains_lateral_motion() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::ZoomModifier { active: true }, &v);
        rig.handle_intent(
            Intent::WheelZoom {
                delta_y: -20.0,
                pointer_ndc: Some((0.5, 0.0)),
            },
            &v,
        );
        // Zooming in toward a point right of center drags the target right
        // and forward.
        assert!(rig.target().x > 0.0);
        assert!(rig.target().z < INITIAL_CAMERA_Z);
    }

    #[test]
    fn zoom_without_pointer_ndc_is_skipped() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::ZoomModifier { active: true }, &v);
        let before = rig.target();
        rig.handle_intent(
            Intent::WheelZoom {
                delta_y: -20.0,
                pointer_ndc: None,
            },
            &v,
        );
        assert_eq!(rig.target(), before);
    }

    #[test]
    fn zoom_with_degenerate_direction_is_skipped() {
        let mut rig = CameraRig::new();
        let eye = glm::vec3(1.0, 2.0, 3.0);
        let before = rig.target();
        rig.zoom_toward(eye, eye, -20.0);
        assert_eq!(rig.target(), before);
        assert!(rig.target().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn releasing_the_modifier_restores_wheel_pan() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::ZoomModifier { active: true }, &v);
        rig.handle_intent(Intent::ZoomModifier { active: false }, &v);
        rig.handle_intent(
            Intent::WheelZoom {
                delta_y: 50.0,
                pointer_ndc: Some((0.0, 0.0)),
            },
            &v,
        );
        assert!(approx(rig.target().y, 50.0 * WHEEL_PAN_GAIN));
        assert_eq!(rig.target().z, INITIAL_CAMERA_Z);
    }

    #[test]
    fn reset_restores_home_even_mid_drag() {
        let mut rig = CameraRig::new();
        let v = view();
        rig.handle_intent(Intent::DragStart { x: 0.0, y: 0.0 }, &v);
        rig.handle_intent(Intent::DragMove { x: 300.0, y: -90.0 }, &v);
        rig.handle_intent(
            Intent::WheelZoom {
                delta_y: 120.0,
                pointer_ndc: Some((0.0, 0.0)),
            },
            &v,
        );
        rig.reset();
        assert_eq!(rig.target(), glm::vec3(0.0, 0.0, INITIAL_CAMERA_Z));
        // The drag itself is still in progress; only the target was reset.
        assert!(rig.is_dragging());
    }

    #[test]
    fn focus_on_applies_offset_and_latest_call_wins() {
        let mut rig = CameraRig::new();
        rig.focus_on(1.0, 2.0, 3.0);
        rig.focus_on(-4.0, 0.5, 0.0);
        assert_eq!(rig.target(), glm::vec3(-4.0, 0.5, FOCUS_OFFSET));
    }

    #[test]
    fn reset_then_focus_equals_focus_alone() {
        let mut rig_a = CameraRig::new();
        rig_a.handle_intent(Intent::Pan { dx: 30.0, dy: 10.0 }, &view());
        rig_a.reset();
        rig_a.focus_on(2.0, -1.0, 0.0);

        let mut rig_b = CameraRig::new();
        rig_b.focus_on(2.0, -1.0, 0.0);

        assert_eq!(rig_a.target(), rig_b.target());
    }

    #[test]
    fn tick_contracts_toward_the_target() {
        let mut rig = CameraRig::new();
        rig.focus_on(4.0, -3.0, 2.0);
        let target = rig.target();

        let mut pose = CameraPose::new();
        let mut dist = glm::length(&(target - pose.position));
        for _ in 0..60 {
            rig.tick(&mut pose);
            let next = glm::length(&(target - pose.position));
            // Each frame removes exactly the damping fraction of the gap.
            assert!(approx(next, dist * (1.0 - DAMPING)));
            assert!(next <= dist);
            dist = next;
        }
        assert!(dist < 0.02);
    }

    #[test]
    fn tick_never_overshoots_on_any_axis() {
        let rig = {
            let mut r = CameraRig::new();
            r.focus_on(5.0, 0.0, 0.0);
            r
        };
        let mut pose = CameraPose::new();
        for _ in 0..200 {
            rig.tick(&mut pose);
            assert!(pose.position.x <= rig.target().x);
            assert!(pose.position.z >= rig.target().z);
        }
    }
}
