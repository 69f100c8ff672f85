use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use egui_wgpu::ScreenDescriptor;
use egui_winit::State;
use winit::window::Window;

use crate::camera::{CameraRig, FocusController, Intent, ViewContext, raycast};
use crate::error::PicError;
use crate::gallery::layout::GridLayout;
use crate::gallery::loader::ImageLoadResult;
use crate::gallery::manager::{Gallery, ImageStatus};
use crate::input::InputEventBus;
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::ui::Ui;

/// A press/release pair whose pointer moved no further than this many pixels
/// counts as a click on the scene rather than a drag.
const CLICK_SLOP: f32 = 4.0;

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

pub struct App {
    pub window: Arc<Window>,
    ui: Ui,
    renderer: Renderer,
    pub(crate) gallery: Gallery,
    layout: GridLayout,
    rig: CameraRig,
    input: InputEventBus,
    focus: FocusController,
    egui_state: State,
    egui_wants_pointer: bool,
    settings: Settings,
    pub(crate) runtime: tokio::runtime::Handle,
    pub(crate) image_sender: Sender<ImageLoadResult>,
    image_receiver: Receiver<ImageLoadResult>,
    /// Folder picked in the UI, loaded from `about_to_wait` on the next turn.
    pub pending_folder: Option<PathBuf>,
    press_pos: Option<(f32, f32)>,
}

impl App {
    pub async fn new(
        window: Arc<Window>,
        runtime: tokio::runtime::Handle,
    ) -> Result<Self, PicError> {
        let ui = Ui::new();

        let renderer = Renderer::new(window.clone()).await?;

        let egui_ctx = renderer.egui_context();
        let egui_state = State::new(
            egui_ctx.clone(),
            egui::viewport::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let settings = Settings::load();

        let size = window.inner_size();
        let input = InputEventBus::new(size.width, size.height);

        let (image_sender, image_receiver) = channel();

        let mut app = Self {
            window,
            ui,
            renderer,
            gallery: Gallery::new(),
            layout: GridLayout::default(),
            rig: CameraRig::new(),
            input,
            focus: FocusController::new(),
            egui_state,
            egui_wants_pointer: false,
            settings,
            runtime,
            image_sender,
            image_receiver,
            pending_folder: None,
            press_pos: None,
        };

        app.renderer.update_colors(&app.settings);
        Ok(app)
    }

    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> EventResponse {
        // Let egui handle the event first
        let egui_response = self.egui_state.on_window_event(&self.window, event);
        let egui_wants_input = egui_response.consumed;

        match event {
            winit::event::WindowEvent::CloseRequested => {
                return EventResponse {
                    repaint: false,
                    exit: true,
                };
            }
            winit::event::WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                if event.logical_key
                    == winit::keyboard::Key::Named(winit::keyboard::NamedKey::Escape)
                {
                    return EventResponse {
                        repaint: false,
                        exit: true,
                    };
                }
                if event.logical_key == winit::keyboard::Key::Named(winit::keyboard::NamedKey::Home)
                    && event.state.is_pressed()
                {
                    self.rig.reset();
                } else if let winit::keyboard::PhysicalKey::Code(code) = event.physical_key {
                    if let Some(intent) = self.input.on_key_code(code, event.state.is_pressed()) {
                        self.apply_intent(intent);
                    }
                }
            }
            winit::event::WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
                self.input.set_viewport(size.width, size.height);
            }
            winit::event::WindowEvent::ModifiersChanged(modifiers) => {
                let intent = self.input.on_modifiers(modifiers.state());
                self.apply_intent(intent);
            }
            winit::event::WindowEvent::MouseInput { state, button, .. } => {
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                let is_pressed = *state == winit::event::ElementState::Pressed;
                if let Some(intent) = self.input.on_mouse_button(*button, is_pressed) {
                    self.apply_intent(intent);
                }
                if *button == winit::event::MouseButton::Left {
                    self.track_click(is_pressed);
                }
            }
            winit::event::WindowEvent::CursorMoved { position, .. } => {
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                let intent = self.input.on_cursor_moved(position.x, position.y);
                self.apply_intent(intent);
            }
            winit::event::WindowEvent::MouseWheel { delta, .. } => {
                if self.egui_wants_pointer {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                let intent = self.input.on_mouse_wheel(*delta);
                self.apply_intent(intent);
            }
            _ => {}
        }

        EventResponse {
            repaint: egui_response.repaint,
            exit: false,
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        let view = ViewContext::new(&self.renderer.camera, self.renderer.aspect());
        self.rig.handle_intent(intent, &view);
    }

    /// Click-versus-drag discrimination for viewport picking. A release close
    /// to its press selects the tile under the pointer.
    fn track_click(&mut self, is_pressed: bool) {
        if is_pressed {
            self.press_pos = self.input.cursor_pos();
            return;
        }
        let (Some((px, py)), Some((rx, ry))) = (self.press_pos.take(), self.input.cursor_pos())
        else {
            return;
        };
        if (rx - px).abs() > CLICK_SLOP || (ry - py).abs() > CLICK_SLOP {
            return;
        }
        self.pick_tile();
    }

    /// Map the pointer to a tile: ray through the click point, intersected
    /// with the grid plane, snapped to the layout cell.
    fn pick_tile(&mut self) {
        let Some((ndc_x, ndc_y)) = self.input.cursor_ndc() else {
            return;
        };
        let ray = raycast::compute_ray(
            ndc_x,
            ndc_y,
            self.renderer.camera.position,
            self.renderer.aspect(),
        );
        let Some(hit) = raycast::intersect_z_plane(&ray, 0.0) else {
            return;
        };
        if let Some(index) = self.layout.cell_at(hit.x, hit.y, self.gallery.len()) {
            self.focus.notify_selected(self.layout.position(index));
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Move finished decodes onto the GPU.
        let mut tiles_dirty = false;
        while let Ok(result) = self.image_receiver.try_recv() {
            match result {
                ImageLoadResult::Success {
                    image_id,
                    rgba_data,
                    width,
                    height,
                } => {
                    // Results for images dropped by a folder switch are stale.
                    if let Some(info) = self.gallery.get_image_mut(image_id) {
                        info.status = ImageStatus::Loaded;
                        info.width = width;
                        info.height = height;
                        self.renderer.upload_image(image_id, &rgba_data, width, height);
                        tiles_dirty = true;
                    }
                }
                ImageLoadResult::Error { image_id, error } => {
                    if let Some(info) = self.gallery.get_image_mut(image_id) {
                        log::warn!("failed to load {}: {}", info.filename, error);
                        info.status = ImageStatus::Error(error);
                    }
                }
            }
        }
        if tiles_dirty {
            // Loaded aspect ratios reshape their quads.
            self.renderer.rebuild_tiles(&self.gallery, &self.layout);
        }

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.renderer.egui_context();

        let mut action = crate::ui::UiAction::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            action = self.ui.show(ctx, &self.gallery, &mut self.settings);
        });

        // Update egui pointer state for next frame
        self.egui_wants_pointer = egui_ctx.wants_pointer_input();

        if action.open_folder {
            if let Some(path) = rfd::FileDialog::new().pick_folder() {
                self.pending_folder = Some(path);
            }
        }
        if action.reset_camera {
            self.rig.reset();
        }
        if action.colors_changed {
            self.renderer.update_colors(&self.settings);
        }
        if let Some(index) = action.focus_image {
            if index < self.gallery.len() {
                self.focus.notify_selected(self.layout.position(index));
            }
        }
        for image_id in action.retry_requests {
            self.start_image_load(image_id);
        }

        if let Some(position) = self.focus.take_request() {
            self.rig.focus_on(position.x, position.y, position.z);
        }

        // All of this frame's input has been applied to the target; now the
        // pose takes its damped step after it.
        self.rig.tick(&mut self.renderer.camera);

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [self.window.inner_size().width, self.window.inner_size().height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        self.renderer.render(
            self.settings.display.show_grid,
            paint_jobs,
            full_output.textures_delta,
            screen_descriptor,
        )
    }

    pub fn load_folder(&mut self, dir: &Path) -> Result<(), PicError> {
        let count = self.gallery.scan_directory(dir)?;
        log::info!("opened {}: {} images", dir.display(), count);

        self.renderer.clear_tiles();
        self.renderer.rebuild_tiles(&self.gallery, &self.layout);

        for image_id in 0..self.gallery.len() {
            self.start_image_load(image_id);
        }

        self.rig.reset();
        Ok(())
    }
}
