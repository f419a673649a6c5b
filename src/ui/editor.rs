use eframe::egui;
use egui::RichText;
use std::path::{Path, PathBuf};

use crate::library::{rating_label, GameEntry, PlayStatus};
use crate::ui::helpers;

/// Editor action
pub enum EditorAction {
    /// Open the cover file picker
    PickCover,
    /// Save the game (starts the simulated save)
    Save,
    /// Close without saving
    Cancel,
}

/// Add/edit game dialog
pub struct EditorView {
    /// ID of the game being edited, None when adding
    game_id: Option<i64>,
    /// Title field
    title: String,
    /// Selected status
    status: PlayStatus,
    /// Selected rating
    rating: u8,
    /// Processed cover staged this session
    staged_cover: Option<PathBuf>,
    /// Existing cover shown while editing, until a new one is picked
    existing_cover: Option<PathBuf>,
    /// Cached preview texture
    preview_texture: Option<egui::TextureHandle>,
    /// Cover processing progress (fraction, message)
    progress: Option<(f32, String)>,
    /// Validation or processing error
    error_message: Option<String>,
    /// Whether the simulated save is in flight
    saving: bool,
}

impl EditorView {
    /// Editor for a new game
    pub fn for_new() -> Self {
        Self {
            game_id: None,
            title: String::new(),
            status: PlayStatus::ToPlay,
            rating: 0,
            staged_cover: None,
            existing_cover: None,
            preview_texture: None,
            progress: None,
            error_message: None,
            saving: false,
        }
    }

    /// Editor prefilled from an existing game
    pub fn for_game(game: &GameEntry, existing_cover: Option<PathBuf>) -> Self {
        Self {
            game_id: Some(game.id),
            title: game.title.clone(),
            status: game.status,
            rating: game.rating,
            staged_cover: None,
            existing_cover,
            preview_texture: None,
            progress: None,
            error_message: None,
            saving: false,
        }
    }

    /// ID of the game being edited
    pub fn game_id(&self) -> Option<i64> {
        self.game_id
    }

    /// Current title field contents
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Selected status
    pub fn status(&self) -> PlayStatus {
        self.status
    }

    /// Selected rating
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Staged cover, if one was processed this session
    pub fn staged_cover(&self) -> Option<&Path> {
        self.staged_cover.as_deref()
    }

    /// Update the cover processing progress bar
    pub fn set_progress(&mut self, progress: Option<(f32, String)>) {
        self.progress = progress;
    }

    /// Adopt a freshly processed cover
    pub fn set_staged_cover(&mut self, staged: PathBuf) {
        self.staged_cover = Some(staged);
        self.progress = None;
        self.error_message = None;
        self.preview_texture = None; // Reload the preview from the new file
    }

    /// Set error message
    pub fn set_error(&mut self, error: Option<String>) {
        self.error_message = error;
        self.progress = None;
    }

    /// Mark the simulated save as started or finished
    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Whether a cover is currently being processed
    pub fn is_processing(&self) -> bool {
        self.progress.is_some()
    }

    /// Show the editor window
    pub fn show<F>(&mut self, ctx: &egui::Context, mut on_action: F)
    where
        F: FnMut(EditorAction),
    {
        let heading = if self.game_id.is_some() {
            "Edit Game"
        } else {
            "Add New Game"
        };

        egui::Window::new(heading)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                if let Some(error) = &self.error_message {
                    ui.label(RichText::new(error.clone()).color(egui::Color32::RED));
                    ui.separator();
                }

                ui.horizontal(|ui| {
                    ui.label("Title:");
                    ui.add_enabled(
                        !self.saving,
                        egui::TextEdit::singleline(&mut self.title).hint_text("Game title"),
                    );
                });

                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    ui.label("Status:");
                    for status in PlayStatus::ALL {
                        ui.radio_value(&mut self.status, status, status.label());
                    }
                });

                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    ui.label("Rating:");
                    if let Some(value) = helpers::star_row(ui, self.rating, 22.0) {
                        if !self.saving {
                            self.rating = value;
                        }
                    }
                    ui.label(RichText::new(rating_label(self.rating)).weak());
                });

                ui.add_space(6.0);
                ui.separator();

                self.render_cover_section(ui, &mut on_action);

                ui.separator();

                ui.horizontal(|ui| {
                    if self.saving {
                        ui.spinner();
                        ui.label("Saving...");
                    } else {
                        if ui.button("Save Game").clicked() {
                            if self.title.trim().is_empty() {
                                self.error_message =
                                    Some("Please enter a title for the game.".to_string());
                            } else {
                                self.error_message = None;
                                on_action(EditorAction::Save);
                            }
                        }
                        if ui.button("Cancel").clicked() {
                            on_action(EditorAction::Cancel);
                        }
                    }
                });
            });
    }

    /// Cover preview, progress bar and picker button
    fn render_cover_section<F>(&mut self, ui: &mut egui::Ui, on_action: &mut F)
    where
        F: FnMut(EditorAction),
    {
        ui.label("Cover:");

        let preview_path = self
            .staged_cover
            .clone()
            .or_else(|| self.existing_cover.clone());

        if let Some(path) = preview_path {
            if self.preview_texture.is_none() {
                self.preview_texture =
                    helpers::load_texture_from_path(ui.ctx(), &path, "editor_cover_preview");
            }

            if let Some(texture) = &self.preview_texture {
                ui.image(texture, egui::vec2(120.0, 160.0));
            } else {
                ui.label("Cover preview unavailable");
            }
        } else {
            ui.label(RichText::new("No cover selected").weak());
        }

        if let Some((fraction, message)) = &self.progress {
            ui.add(egui::ProgressBar::new(*fraction).text(message.clone()));
        }

        let pick_enabled = !self.saving && !self.is_processing();
        if ui
            .add_enabled(pick_enabled, egui::Button::new("Choose Cover..."))
            .clicked()
        {
            on_action(EditorAction::PickCover);
        }
    }
}
