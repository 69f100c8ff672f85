use crate::app::app::App;
use crate::gallery::loader::{ImageLoadResult, load_image};
use crate::gallery::manager::ImageStatus;

impl App {
    /// Kick off a background decode for one image. The task reports back
    /// through the app's channel; the render loop drains it.
    pub(crate) fn start_image_load(&mut self, image_id: usize) {
        let Some(info) = self.gallery.get_image_mut(image_id) else {
            return;
        };
        if info.is_loading() {
            return;
        }
        info.status = ImageStatus::Loading;

        let path = info.path.clone();
        let sender = self.image_sender.clone();

        self.runtime.spawn(async move {
            match load_image(&path).await {
                Ok((rgba_data, width, height)) => {
                    let _ = sender.send(ImageLoadResult::Success {
                        image_id,
                        rgba_data,
                        width,
                        height,
                    });
                }
                Err(e) => {
                    let _ = sender.send(ImageLoadResult::Error {
                        image_id,
                        error: e.to_string(),
                    });
                }
            }
        });
    }
}
