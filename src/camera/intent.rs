/// The closed set of navigation intents the input layer produces. Everything
/// host-specific stops at the `InputEventBus`; the rig consumes only these.
///
/// Pointer coordinates are window pixels; `pointer_ndc` is the pointer mapped
/// to normalized device coordinates, `None` when the viewport size is not yet
/// known. `delta_y` follows the scroll convention the gains are tuned for:
/// positive means scroll down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Pan { dx: f32, dy: f32 },
    ZoomModifier { active: bool },
    DragStart { x: f32, y: f32 },
    DragMove { x: f32, y: f32 },
    DragEnd,
    WheelZoom {
        delta_y: f32,
        pointer_ndc: Option<(f32, f32)>,
    },
}
