use eframe::egui;
use egui::{Align, Layout, RichText};
use std::collections::HashMap;
use std::path::Path;

use crate::library::{GameEntry, LibraryStore, PlayStatus, StatusFilter};
use crate::ui::helpers;

/// Library view action
pub enum LibraryAction {
    /// Open the editor for a new game
    AddGame,
    /// Open the editor for an existing game
    EditGame(i64),
    /// Ask to delete a game
    DeleteGame(i64),
    /// Advance a game's status
    CycleStatus(i64),
    /// Set a game's star rating
    SetRating(i64, u8),
}

/// Library view
pub struct LibraryView {
    /// Active status filter
    filter: StatusFilter,
    /// Title search query
    search_query: String,
    /// Cache for loaded cover textures
    cover_textures: HashMap<i64, Option<egui::TextureHandle>>,
}

impl LibraryView {
    /// Create a new library view
    pub fn new() -> Self {
        Self {
            filter: StatusFilter::All,
            search_query: String::new(),
            cover_textures: HashMap::new(),
        }
    }

    /// Show the library view
    pub fn show<F>(
        &mut self,
        ui: &mut egui::Ui,
        store: &LibraryStore,
        removing: Option<i64>,
        mut on_action: F,
    ) where
        F: FnMut(LibraryAction),
    {
        ui.horizontal(|ui| {
            ui.label("Filter:");
            if ui
                .selectable_label(self.filter == StatusFilter::All, "All")
                .clicked()
            {
                self.filter = StatusFilter::All;
            }
            for status in PlayStatus::ALL {
                let selected = self.filter == StatusFilter::Only(status);
                if ui.selectable_label(selected, status.label()).clicked() {
                    self.filter = StatusFilter::Only(status);
                }
            }
            ui.separator();
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search_query);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("Add Game").clicked() {
                    on_action(LibraryAction::AddGame);
                }
            });
        });

        ui.separator();

        let stats = store.stats();
        ui.horizontal(|ui| {
            ui.label(format!("{} games tracked", stats.total));
            ui.separator();
            ui.label(format!("{} played", stats.played));
            ui.separator();
            ui.label(format!("Showing: {}", self.filter.label()));
        });

        ui.separator();

        let games = store.filtered(self.filter, &self.search_query);

        if games.is_empty() {
            self.show_empty_state(ui, store, &mut on_action);
            return;
        }

        self.show_grid(ui, store, &games, removing, &mut on_action);
    }

    /// Message shown when nothing matches the current filter
    fn show_empty_state<F>(&mut self, ui: &mut egui::Ui, store: &LibraryStore, on_action: &mut F)
    where
        F: FnMut(LibraryAction),
    {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            if store.games().is_empty() {
                ui.heading("Your shelf is empty");
                ui.label("Track the games you want to play, are playing, or have played.");
                ui.add_space(10.0);
                if ui.button("Add your first game").clicked() {
                    on_action(LibraryAction::AddGame);
                }
            } else {
                ui.heading("No games match this filter");
                ui.label("Try another status or clear the search.");
            }
        });
    }

    /// Card grid
    fn show_grid<F>(
        &mut self,
        ui: &mut egui::Ui,
        store: &LibraryStore,
        games: &[&GameEntry],
        removing: Option<i64>,
        on_action: &mut F,
    ) where
        F: FnMut(LibraryAction),
    {
        const THUMBNAIL_SIZE: f32 = 160.0;
        const COVER_HEIGHT: f32 = 220.0;
        const ITEMS_PER_ROW: usize = 4;

        egui::ScrollArea::vertical().show(ui, |ui| {
            let available_width = ui.available_width();
            let item_width = (available_width / ITEMS_PER_ROW as f32).min(THUMBNAIL_SIZE + 20.0);

            let grid = egui::Grid::new("game_grid")
                .spacing([20.0, 20.0])
                .min_col_width(item_width)
                .max_col_width(item_width);

            grid.show(ui, |ui| {
                for (i, game) in games.iter().enumerate() {
                    if i > 0 && i % ITEMS_PER_ROW == 0 {
                        ui.end_row();
                    }

                    let is_removing = removing == Some(game.id);

                    ui.vertical(|ui| {
                        if store.has_cover(game) {
                            if let Some(cover_path) = store.cover_file_for(game) {
                                self.render_game_cover(
                                    ui,
                                    game.id,
                                    &cover_path,
                                    THUMBNAIL_SIZE,
                                    COVER_HEIGHT,
                                );
                            }
                        } else {
                            let cover_rect = egui::Rect::from_min_size(
                                ui.cursor().min,
                                egui::vec2(THUMBNAIL_SIZE, COVER_HEIGHT),
                            );
                            ui.allocate_ui_at_rect(cover_rect, |ui| {
                                ui.painter().rect_filled(
                                    cover_rect,
                                    4.0,
                                    egui::Color32::from_rgb(42, 45, 55),
                                );
                                ui.centered_and_justified(|ui| {
                                    ui.label(&game.title);
                                });
                            });
                        }

                        // Status badge cycles the status when clicked
                        let badge = egui::Button::new(
                            RichText::new(game.status.label())
                                .small()
                                .color(egui::Color32::WHITE),
                        )
                        .fill(status_color(game.status));
                        if ui.add_enabled(!is_removing, badge).clicked() {
                            on_action(LibraryAction::CycleStatus(game.id));
                        }

                        let title = if game.title.len() > 20 {
                            format!("{}...", &game.title[..17])
                        } else {
                            game.title.clone()
                        };
                        ui.label(RichText::new(title).strong());

                        if let Some(value) = helpers::star_row(ui, game.rating, 16.0) {
                            if !is_removing {
                                on_action(LibraryAction::SetRating(game.id, value));
                            }
                        }

                        if let Some(date) = game.added_date() {
                            ui.label(RichText::new(format!("Added {}", date)).weak().small());
                        }

                        if is_removing {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label("Removing...");
                            });
                        } else {
                            ui.horizontal(|ui| {
                                if ui.button("Edit").clicked() {
                                    on_action(LibraryAction::EditGame(game.id));
                                }
                                if ui.button("Delete").clicked() {
                                    on_action(LibraryAction::DeleteGame(game.id));
                                }
                            });
                        }
                    });
                }
            });
        });
    }

    /// Render game cover using the helper function
    fn render_game_cover(&mut self, ui: &mut egui::Ui, game_id: i64, path: &Path, width: f32, height: f32) {
        if !self.cover_textures.contains_key(&game_id) {
            let texture =
                helpers::load_texture_from_path(ui.ctx(), path, &format!("game_cover_{}", game_id));
            self.cover_textures.insert(game_id, texture);
        }

        let cover_rect = egui::Rect::from_min_size(ui.cursor().min, egui::vec2(width, height));
        ui.allocate_rect(cover_rect, egui::Sense::hover());

        if let Some(Some(texture)) = self.cover_textures.get(&game_id) {
            ui.painter().image(
                texture.id(),
                cover_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            ui.painter()
                .rect_filled(cover_rect, 4.0, egui::Color32::from_rgb(42, 45, 55));
            ui.painter().text(
                cover_rect.center(),
                egui::Align2::CENTER_CENTER,
                "No Cover",
                egui::FontId::default(),
                egui::Color32::WHITE,
            );
        }
    }

    /// Drop the cached texture for one game
    pub fn clear_cover_texture(&mut self, game_id: i64) {
        self.cover_textures.remove(&game_id);
    }

    /// Clear cover texture cache
    pub fn clear_texture_cache(&mut self) {
        self.cover_textures.clear();
    }
}

/// Badge color per status
fn status_color(status: PlayStatus) -> egui::Color32 {
    match status {
        PlayStatus::ToPlay => egui::Color32::from_rgb(82, 94, 110),
        PlayStatus::Playing => egui::Color32::from_rgb(41, 128, 185),
        PlayStatus::Played => egui::Color32::from_rgb(39, 174, 96),
    }
}
