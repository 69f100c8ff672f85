use std::path::{Path, PathBuf};

use crate::error::PicError;

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    Pending,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub image_id: usize,
    pub filename: String,
    pub path: PathBuf,
    pub status: ImageStatus,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(image_id: usize, path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("?")
            .to_string();
        Self {
            image_id,
            filename,
            path,
            status: ImageStatus::Pending,
            width: 0,
            height: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, ImageStatus::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, ImageStatus::Loaded)
    }

    pub fn has_error(&self) -> bool {
        matches!(self.status, ImageStatus::Error(_))
    }

    /// Aspect ratio of the decoded image, 1.0 until dimensions are known.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn status_text(&self) -> String {
        match &self.status {
            ImageStatus::Pending => "Pending".to_string(),
            ImageStatus::Loading => "Loading...".to_string(),
            ImageStatus::Loaded => format!("Loaded ({}x{})", self.width, self.height),
            ImageStatus::Error(err) => format!("Error: {}", err),
        }
    }

    pub fn status_color(&self) -> egui::Color32 {
        match &self.status {
            ImageStatus::Pending => egui::Color32::GRAY,
            ImageStatus::Loading => egui::Color32::YELLOW,
            ImageStatus::Loaded => egui::Color32::GREEN,
            ImageStatus::Error(_) => egui::Color32::RED,
        }
    }
}

/// The set of images on display: one `ImageInfo` per supported file found in
/// the opened directory, ordered by filename so the grid is stable across
/// runs.
pub struct Gallery {
    pub images: Vec<ImageInfo>,
    directory: Option<PathBuf>,
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            images: Vec::new(),
            directory: None,
        }
    }

    /// Replace the gallery contents with the supported images found directly
    /// in `dir` (no recursion). Returns how many were found.
    pub fn scan_directory(&mut self, dir: &Path) -> Result<usize, PicError> {
        if !dir.is_dir() {
            return Err(PicError::NotADirectory(dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_supported_extension(path))
            .collect();
        paths.sort();

        self.directory = Some(dir.to_path_buf());
        self.images = paths
            .into_iter()
            .enumerate()
            .map(|(id, path)| ImageInfo::new(id, path))
            .collect();

        Ok(self.images.len())
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn get_image(&self, id: usize) -> Option<&ImageInfo> {
        self.images.get(id)
    }

    pub fn get_image_mut(&mut self, id: usize) -> Option<&mut ImageInfo> {
        self.images.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn loading_count(&self) -> usize {
        self.images.iter().filter(|i| i.is_loading()).count()
    }

    pub fn loaded_count(&self) -> usize {
        self.images.iter().filter(|i| i.is_loaded()).count()
    }

    pub fn error_count(&self) -> usize {
        self.images.iter().filter(|i| i.has_error()).count()
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_supported_extension(Path::new("a/b/photo.PNG")));
        assert!(has_supported_extension(Path::new("shot.jpeg")));
        assert!(!has_supported_extension(Path::new("model.mdx")));
        assert!(!has_supported_extension(Path::new("no_extension")));
    }

    #[test]
    fn scan_rejects_non_directories() {
        let mut gallery = Gallery::new();
        let err = gallery.scan_directory(Path::new("/definitely/not/a/dir"));
        assert!(matches!(err, Err(PicError::NotADirectory(_))));
    }

    #[test]
    fn fresh_image_reports_square_aspect() {
        let info = ImageInfo::new(0, PathBuf::from("x.png"));
        assert_eq!(info.aspect(), 1.0);
        assert_eq!(info.status, ImageStatus::Pending);
    }
}
