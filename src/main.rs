use std::path::PathBuf;

use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod camera;
mod error;
mod gallery;
mod input;
mod renderer;
mod settings;
mod ui;

pub const CONFY_APP_NAME: &str = "picvis-rs";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional image folder on the command line
    let folder = std::env::args().nth(1).map(PathBuf::from);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = app::AppHandler::new(folder, tokio::runtime::Runtime::new()?);
    event_loop.run_app(&mut handler)?;

    Ok(())
}
