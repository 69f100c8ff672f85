use crate::gallery::manager::Gallery;
use crate::settings::Settings;

/// What the chrome asked for this frame; consumed by the app after the egui
/// pass.
#[derive(Default)]
pub struct UiAction {
    pub open_folder: bool,
    pub reset_camera: bool,
    pub colors_changed: bool,
    pub focus_image: Option<usize>,
    pub retry_requests: Vec<usize>,
}

pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        gallery: &Gallery,
        settings: &mut Settings,
    ) -> UiAction {
        let mut action = UiAction::default();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("📁 Open Folder").clicked() {
                    action.open_folder = true;
                }

                if ui.button("🎥 Reset View").clicked() {
                    action.reset_camera = true;
                }

                ui.separator();

                if ui
                    .button(if settings.ui.show_browser_panel {
                        "✅ Browser"
                    } else {
                        "⬜ Browser"
                    })
                    .clicked()
                {
                    settings.ui.show_browser_panel = !settings.ui.show_browser_panel;
                    settings.ui.save();
                }

                if ui
                    .button(if settings.ui.show_colors {
                        "✅ Colors"
                    } else {
                        "⬜ Colors"
                    })
                    .clicked()
                {
                    settings.ui.show_colors = !settings.ui.show_colors;
                    settings.ui.save();
                }

                if ui
                    .button(if settings.ui.show_controls_help {
                        "✅ Controls"
                    } else {
                        "⬜ Controls"
                    })
                    .clicked()
                {
                    settings.ui.show_controls_help = !settings.ui.show_controls_help;
                    settings.ui.save();
                }

                if ui
                    .button(if settings.display.show_grid {
                        "✅ Grid"
                    } else {
                        "⬜ Grid"
                    })
                    .clicked()
                {
                    settings.display.show_grid = !settings.display.show_grid;
                    settings.display.save();
                }

                ui.separator();

                match gallery.directory() {
                    Some(dir) => {
                        ui.label(format!(
                            "{}: {} images, {} loaded",
                            dir.file_name()
                                .and_then(|n| n.to_str())
                                .unwrap_or("folder"),
                            gallery.len(),
                            gallery.loaded_count()
                        ));
                    }
                    None => {
                        ui.label("No folder open");
                    }
                }
            });
        });

        if settings.ui.show_browser_panel {
            self.show_browser_window(ctx, gallery, settings, &mut action);
        }

        if settings.ui.show_colors {
            action.colors_changed = self.show_colors_window(ctx, settings);
        }

        if settings.ui.show_controls_help {
            self.show_controls_window(ctx, settings);
        }

        action
    }

    fn show_browser_window(
        &mut self,
        ctx: &egui::Context,
        gallery: &Gallery,
        settings: &mut Settings,
        action: &mut UiAction,
    ) {
        egui::Window::new("Browser")
            .default_width(320.0)
            .default_height(480.0)
            .resizable(true)
            .open(&mut settings.ui.show_browser_panel)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("Total: {}", gallery.len()));
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::GREEN,
                        format!("Loaded: {}", gallery.loaded_count()),
                    );
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("Loading: {}", gallery.loading_count()),
                    );
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::RED,
                        format!("Errors: {}", gallery.error_count()),
                    );
                });

                ui.separator();

                if gallery.error_count() > 0 && ui.button("Retry Failed").clicked() {
                    for image in &gallery.images {
                        if image.has_error() {
                            action.retry_requests.push(image.image_id);
                        }
                    }
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for image in &gallery.images {
                            ui.horizontal(|ui| {
                                let radius = 5.0;
                                let (rect, _response) = ui.allocate_exact_size(
                                    egui::vec2(radius * 2.0, radius * 2.0),
                                    egui::Sense::hover(),
                                );
                                ui.painter().circle_filled(
                                    rect.center(),
                                    radius,
                                    image.status_color(),
                                );

                                // Clicking an entry flies the camera to it.
                                if ui.link(&image.filename).clicked() {
                                    action.focus_image = Some(image.image_id);
                                }
                            })
                            .response
                            .on_hover_text(image.status_text());
                        }
                    });
            });
    }

    fn show_colors_window(&mut self, ctx: &egui::Context, settings: &mut Settings) -> bool {
        let mut changed = false;
        let mut open = settings.ui.show_colors;

        egui::Window::new("Colors")
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Background:");
                    changed |= ui
                        .color_edit_button_rgb(&mut settings.colors.background_color)
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Grid major:");
                    changed |= ui
                        .color_edit_button_rgb(&mut settings.colors.grid_major_color)
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Grid minor:");
                    changed |= ui
                        .color_edit_button_rgb(&mut settings.colors.grid_minor_color)
                        .changed();
                });
            });

        settings.ui.show_colors = open;
        if changed {
            settings.colors.save();
        }
        changed
    }

    fn show_controls_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        egui::Window::new("Controls")
            .resizable(false)
            .open(&mut settings.ui.show_controls_help)
            .show(ctx, |ui| {
                ui.label("Drag: pan the view");
                ui.label("Wheel: scroll vertically");
                ui.label("Ctrl + Wheel: zoom toward the cursor");
                ui.label("Arrows: pan");
                ui.label("Click an image: fly to it");
                ui.label("Home: reset the view");
                ui.label("Esc: quit");
            });
    }
}
