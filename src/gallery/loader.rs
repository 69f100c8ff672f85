use std::path::Path;

use crate::error::PicError;

/// Decoded images are downscaled to fit inside this many pixels per side
/// before upload, keeping GPU memory bounded for large photo folders.
pub const MAX_TEXTURE_DIM: u32 = 2048;

/// Outcome of one background decode task, sent back to the event loop
/// thread over the app's channel.
pub enum ImageLoadResult {
    Success {
        image_id: usize,
        rgba_data: Vec<u8>,
        width: u32,
        height: u32,
    },
    Error {
        image_id: usize,
        error: String,
    },
}

/// Read raw image bytes from disk.
pub async fn load_from_file(path: &Path) -> Result<Vec<u8>, PicError> {
    let data = tokio::fs::read(path).await?;
    Ok(data)
}

/// Decode image bytes to RGBA8, downscaling oversized images.
pub fn decode_image(data: &[u8]) -> Result<(Vec<u8>, u32, u32), PicError> {
    let img = image::load_from_memory(data)?;

    let img = if img.width() > MAX_TEXTURE_DIM || img.height() > MAX_TEXTURE_DIM {
        img.thumbnail(MAX_TEXTURE_DIM, MAX_TEXTURE_DIM)
    } else {
        img
    };

    let width = img.width();
    let height = img.height();
    let rgba_data = img.to_rgba8().into_raw();

    Ok((rgba_data, width, height))
}

/// Read and decode an image file.
pub async fn load_image(path: &Path) -> Result<(Vec<u8>, u32, u32), PicError> {
    let data = load_from_file(path).await?;
    decode_image(&data)
}
