use nalgebra_glm as glm;

/// Distance of the camera from the origin when a session starts. `reset`
/// returns the navigation target to this pose.
pub const INITIAL_CAMERA_Z: f32 = 10.0;

pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_4; // 45 degrees
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// The camera's world position. Orientation is fixed: the camera always looks
/// along -z with +y up, so no rotation component is stored. Owned by the
/// renderer; mutated only by `CameraRig::tick`.
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    pub position: glm::Vec3,
}

impl CameraPose {
    pub fn new() -> Self {
        Self {
            position: glm::vec3(0.0, 0.0, INITIAL_CAMERA_Z),
        }
    }

    pub fn view_matrix(&self) -> glm::Mat4 {
        let center = self.position + glm::vec3(0.0, 0.0, -1.0);
        glm::look_at(&self.position, &center, &glm::vec3(0.0, 1.0, 0.0))
    }

    pub fn view_proj(&self, aspect: f32) -> glm::Mat4 {
        let proj = glm::perspective(aspect, FOV_Y, NEAR_PLANE, FAR_PLANE);
        proj * self.view_matrix()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the scene the rig needs when handling a zoom intent:
/// the camera's current actual position and the viewport aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext {
    pub eye: glm::Vec3,
    pub aspect: f32,
}

impl ViewContext {
    pub fn new(pose: &CameraPose, aspect: f32) -> Self {
        Self {
            eye: pose.position,
            aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_pose_sits_on_positive_z() {
        let pose = CameraPose::new();
        assert_eq!(pose.position, glm::vec3(0.0, 0.0, INITIAL_CAMERA_Z));
    }

    #[test]
    fn view_matrix_maps_origin_in_front_of_camera() {
        let pose = CameraPose::new();
        let view = pose.view_matrix();
        let origin = view * glm::vec4(0.0, 0.0, 0.0, 1.0);
        // The world origin lies INITIAL_CAMERA_Z units down the view axis.
        assert!((origin.x).abs() < 1e-5);
        assert!((origin.y).abs() < 1e-5);
        assert!((origin.z + INITIAL_CAMERA_Z).abs() < 1e-5);
    }
}
