use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, ModifiersState};

use crate::camera::Intent;
use crate::camera::raycast;

/// Pixels of scroll one wheel notch stands for when the host reports line
/// deltas.
pub const LINE_DELTA_STEP: f32 = 40.0;
/// Pixel-equivalent pan applied per arrow key press.
pub const ARROW_PAN_STEP: f32 = 30.0;

/// Translates raw window input into the rig's `Intent` vocabulary. The only
/// layer that sees winit types; it owns nothing but the last pointer position
/// and the viewport rectangle needed for pixel-to-NDC conversion. Methods
/// take plain winit value types so the bus is testable without a window.
pub struct InputEventBus {
    cursor_pos: Option<(f32, f32)>,
    viewport: (f32, f32),
}

impl InputEventBus {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cursor_pos: None,
            viewport: (width as f32, height as f32),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    pub fn cursor_pos(&self) -> Option<(f32, f32)> {
        self.cursor_pos
    }

    /// Pointer in normalized device coordinates, `None` before the pointer
    /// first enters the window or while the viewport is degenerate.
    pub fn cursor_ndc(&self) -> Option<(f32, f32)> {
        let (x, y) = self.cursor_pos?;
        raycast::pointer_to_ndc(x, y, self.viewport.0, self.viewport.1)
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Intent {
        let pos = (x as f32, y as f32);
        self.cursor_pos = Some(pos);
        // Always a DragMove; the rig ignores it unless a drag is in progress.
        Intent::DragMove { x: pos.0, y: pos.1 }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) -> Option<Intent> {
        if button != MouseButton::Left {
            return None;
        }
        if pressed {
            let (x, y) = self.cursor_pos?;
            Some(Intent::DragStart { x, y })
        } else {
            Some(Intent::DragEnd)
        }
    }

    pub fn on_modifiers(&mut self, state: ModifiersState) -> Intent {
        Intent::ZoomModifier {
            active: state.control_key(),
        }
    }

    /// Normalize both wheel flavors into one signed pixel delta where
    /// positive means scroll down, the convention the rig's gains assume.
    pub fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) -> Intent {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_DELTA_STEP,
            MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
        };
        Intent::WheelZoom {
            delta_y,
            pointer_ndc: self.cursor_ndc(),
        }
    }

    pub fn on_key_code(&mut self, code: KeyCode, pressed: bool) -> Option<Intent> {
        if !pressed {
            return None;
        }
        match code {
            KeyCode::ArrowLeft => Some(Intent::Pan {
                dx: ARROW_PAN_STEP,
                dy: 0.0,
            }),
            KeyCode::ArrowRight => Some(Intent::Pan {
                dx: -ARROW_PAN_STEP,
                dy: 0.0,
            }),
            KeyCode::ArrowUp => Some(Intent::Pan {
                dx: 0.0,
                dy: ARROW_PAN_STEP,
            }),
            KeyCode::ArrowDown => Some(Intent::Pan {
                dx: 0.0,
                dy: -ARROW_PAN_STEP,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn bus() -> InputEventBus {
        InputEventBus::new(800, 600)
    }

    #[test]
    fn cursor_move_is_a_drag_move() {
        let mut bus = bus();
        let intent = bus.on_cursor_moved(120.0, 40.0);
        assert_eq!(intent, Intent::DragMove { x: 120.0, y: 40.0 });
        assert_eq!(bus.cursor_pos(), Some((120.0, 40.0)));
    }

    #[test]
    fn left_press_starts_a_drag_at_the_pointer() {
        let mut bus = bus();
        bus.on_cursor_moved(300.0, 200.0);
        let intent = bus.on_mouse_button(MouseButton::Left, true);
        assert_eq!(intent, Some(Intent::DragStart { x: 300.0, y: 200.0 }));
        let intent = bus.on_mouse_button(MouseButton::Left, false);
        assert_eq!(intent, Some(Intent::DragEnd));
    }

    #[test]
    fn press_before_any_cursor_position_is_dropped() {
        let mut bus = bus();
        assert_eq!(bus.on_mouse_button(MouseButton::Left, true), None);
    }

    #[test]
    fn non_left_buttons_are_ignored() {
        let mut bus = bus();
        bus.on_cursor_moved(10.0, 10.0);
        assert_eq!(bus.on_mouse_button(MouseButton::Right, true), None);
        assert_eq!(bus.on_mouse_button(MouseButton::Middle, true), None);
    }

    #[test]
    fn control_modifier_toggles_zoom() {
        let mut bus = bus();
        assert_eq!(
            bus.on_modifiers(ModifiersState::CONTROL),
            Intent::ZoomModifier { active: true }
        );
        assert_eq!(
            bus.on_modifiers(ModifiersState::empty()),
            Intent::ZoomModifier { active: false }
        );
    }

    #[test]
    fn line_scroll_up_normalizes_to_negative_delta() {
        let mut bus = bus();
        bus.on_cursor_moved(400.0, 300.0);
        let intent = bus.on_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        match intent {
            Intent::WheelZoom {
                delta_y,
                pointer_ndc,
            } => {
                assert_eq!(delta_y, -LINE_DELTA_STEP);
                let (nx, ny) = pointer_ndc.unwrap();
                assert!(nx.abs() < 1e-6);
                assert!(ny.abs() < 1e-6);
            }
            other => panic!("expected WheelZoom, got {other:?}"),
        }
    }

    #[test]
    fn pixel_scroll_passes_magnitude_through() {
        let mut bus = bus();
        let intent =
            bus.on_mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -24.0)));
        match intent {
            Intent::WheelZoom {
                delta_y,
                pointer_ndc,
            } => {
                assert_eq!(delta_y, 24.0);
                // Pointer never entered the window: no NDC available.
                assert_eq!(pointer_ndc, None);
            }
            other => panic!("expected WheelZoom, got {other:?}"),
        }
    }

    #[test]
    fn degenerate_viewport_withholds_ndc() {
        let mut bus = bus();
        bus.on_cursor_moved(10.0, 10.0);
        bus.set_viewport(0, 0);
        let intent = bus.on_mouse_wheel(MouseScrollDelta::LineDelta(0.0, -2.0));
        match intent {
            Intent::WheelZoom { pointer_ndc, .. } => assert_eq!(pointer_ndc, None),
            other => panic!("expected WheelZoom, got {other:?}"),
        }
    }

    #[test]
    fn arrow_keys_pan() {
        let mut bus = bus();
        assert_eq!(
            bus.on_key_code(KeyCode::ArrowUp, true),
            Some(Intent::Pan {
                dx: 0.0,
                dy: ARROW_PAN_STEP
            })
        );
        assert_eq!(bus.on_key_code(KeyCode::ArrowUp, false), None);
        assert_eq!(bus.on_key_code(KeyCode::KeyW, true), None);
    }
}
