use eframe::egui;
use std::fs;
use std::path::Path;

use crate::library::MAX_RATING;

pub fn load_texture_from_path(ctx: &egui::Context, path: &Path, texture_id: &str) -> Option<egui::TextureHandle> {
    if path.exists() {
        if let Ok(image_data) = fs::read(path) {
            if let Ok(image) = image::load_from_memory(&image_data) {
                let size = [image.width() as _, image.height() as _];
                let image_rgba = image.to_rgba8();
                let pixels = image_rgba.as_flat_samples();
                let texture = ctx.load_texture(
                    texture_id,
                    egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
                    egui::TextureOptions::default(),
                );
                return Some(texture);
            }
        }
    }
    None
}

/// Clickable star row. Stars up to the hovered one light up; without a hover
/// the stored rating is shown. Returns the clicked value, if any.
pub fn star_row(ui: &mut egui::Ui, rating: u8, size: f32) -> Option<u8> {
    let mut clicked = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;

        let mut slots = Vec::with_capacity(MAX_RATING as usize);
        for value in 1..=MAX_RATING {
            let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());
            if response.clicked() {
                clicked = Some(value);
            }
            slots.push((value, rect, response.hovered()));
        }

        let shown = slots
            .iter()
            .find(|(_, _, hovered)| *hovered)
            .map(|(value, _, _)| *value)
            .unwrap_or(rating);

        for (value, rect, _) in slots {
            let color = if value <= shown {
                egui::Color32::GOLD
            } else {
                egui::Color32::DARK_GRAY
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "★",
                egui::FontId::proportional(size),
                color,
            );
        }
    });

    clicked
}
