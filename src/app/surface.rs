//! egui texture as the waterfall's render surface

use eframe::egui;

use crate::core::errors::RenderError;
use crate::core::waterfall::{RenderSurface, WaterfallBuffer};

/// Uploads the waterfall buffer into a single egui texture on every present.
pub struct TextureSurface {
    ctx: egui::Context,
    texture: Option<egui::TextureHandle>,
}

impl TextureSurface {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            texture: None,
        }
    }

    /// Texture id and pixel size, once the first present happened
    pub fn texture(&self) -> Option<(egui::TextureId, egui::Vec2)> {
        self.texture.as_ref().map(|t| (t.id(), t.size_vec2()))
    }
}

impl RenderSurface for TextureSurface {
    fn present(&mut self, buffer: &WaterfallBuffer) -> Result<(), RenderError> {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width(), buffer.height()],
            buffer.as_bytes(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(self.ctx.load_texture(
                    "waterfall",
                    image,
                    egui::TextureOptions::NEAREST,
                ));
            }
        }
        Ok(())
    }
}
