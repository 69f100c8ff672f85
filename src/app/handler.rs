use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::app::app::App;

pub struct AppHandler {
    pub app: Option<App>,
    pub folder: Option<PathBuf>,
    pub runtime: Runtime,
}

impl AppHandler {
    pub fn new(folder: Option<PathBuf>, runtime: Runtime) -> Self {
        Self {
            app: None,
            folder,
            runtime,
        }
    }

    fn open_folder(app: &mut App, folder: &std::path::Path) {
        if let Err(e) = app.load_folder(folder) {
            log::error!("failed to open folder '{}': {}", folder.display(), e);
        }
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("PicVis-RS - 3D Image Browser")
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0));
        let window = event_loop.create_window(window_attrs).unwrap();

        let runtime_handle = self.runtime.handle().clone();
        let mut app = self
            .runtime
            .block_on(App::new(Arc::new(window), runtime_handle))
            .unwrap();

        // Folder given on the command line
        if let Some(folder) = self.folder.take() {
            Self::open_folder(&mut app, &folder);
        }

        self.app = Some(app);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else { return };

        let response = app.handle_event(&event);
        if response.repaint {
            app.window.request_redraw();
        }
        if response.exit {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(app) = &mut self.app else { return };

        // Folder picked in the UI since the last turn
        if let Some(folder) = app.pending_folder.take() {
            Self::open_folder(app, &folder);
        }

        if let Err(e) = app.render() {
            log::error!("render error: {e:?}");
        }
        app.window.request_redraw();
    }
}
