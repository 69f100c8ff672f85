pub mod focus;
pub mod intent;
pub mod pose;
pub mod raycast;
pub mod rig;

pub use focus::FocusController;
pub use intent::Intent;
pub use pose::{CameraPose, ViewContext};
pub use rig::CameraRig;
