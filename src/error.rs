use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PicError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("surface creation error: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("device request error: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}
