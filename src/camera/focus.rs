use nalgebra_glm as glm;

/// Adapter between "an image was activated" notifications and the rig's
/// `focus_on`. Selections land here from the UI (browser panel clicks) and
/// from viewport picking; the app drains the latest one each frame. Only the
/// most recent selection survives: focusing is last-write-wins.
pub struct FocusController {
    pending: Option<glm::Vec3>,
}

impl FocusController {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn notify_selected(&mut self, position: glm::Vec3) {
        self.pending = Some(position);
    }

    pub fn take_request(&mut self) -> Option<glm::Vec3> {
        self.pending.take()
    }
}

impl Default for FocusController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::rig::{CameraRig, FOCUS_OFFSET};

    #[test]
    fn latest_selection_wins() {
        let mut focus = FocusController::new();
        focus.notify_selected(glm::vec3(1.0, 1.0, 0.0));
        focus.notify_selected(glm::vec3(-2.0, 4.0, 0.0));
        assert_eq!(focus.take_request(), Some(glm::vec3(-2.0, 4.0, 0.0)));
        assert_eq!(focus.take_request(), None);
    }

    #[test]
    fn drains_into_the_rig() {
        let mut focus = FocusController::new();
        let mut rig = CameraRig::new();
        focus.notify_selected(glm::vec3(3.0, -1.5, 0.0));
        if let Some(p) = focus.take_request() {
            rig.focus_on(p.x, p.y, p.z);
        }
        assert_eq!(rig.target(), glm::vec3(3.0, -1.5, FOCUS_OFFSET));
    }
}
