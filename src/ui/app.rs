use eframe::egui;
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::covers;
use crate::library::{LibraryStore, Preferences, Theme};
use crate::ui::editor::{EditorAction, EditorView};
use crate::ui::library_view::{LibraryAction, LibraryView};

/// Status updates from the background cover pipeline
pub enum CoverStatus {
    /// Processing progress
    Progress { fraction: f32, message: String },
    /// Processed cover staged on disk
    Ready { staged: PathBuf },
    /// Processing failed
    Failed { error: String },
}

/// Game Shelf app
pub struct GameShelfApp {
    /// Configuration
    config: Config,
    /// Game collection store
    store: LibraryStore,
    /// Persisted preferences
    prefs: Preferences,
    /// Library view
    library_view: LibraryView,
    /// Add/edit dialog, when open
    editor: Option<EditorView>,
    /// Game awaiting delete confirmation
    confirm_delete: Option<i64>,
    /// Game in its pre-removal affordance
    removing: Option<i64>,

    // Tokio runtime for background tasks
    rt: Runtime,

    // Channel for the simulated save delay
    save_receiver: Option<Receiver<()>>,

    // Channel for the pre-removal delay
    remove_receiver: Option<Receiver<i64>>,

    // Channel for cover pipeline updates
    cover_receiver: Option<Receiver<CoverStatus>>,

    // Channel for file dialog results
    dialog_receiver: Option<Receiver<Option<PathBuf>>>,
}

impl GameShelfApp {
    /// Create a new app
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        store: LibraryStore,
        prefs: Preferences,
    ) -> Self {
        // Create tokio runtime
        let rt = Runtime::new().expect("Failed to create runtime");

        apply_theme(&cc.egui_ctx, prefs.theme);

        Self {
            config,
            store,
            prefs,
            library_view: LibraryView::new(),
            editor: None,
            confirm_delete: None,
            removing: None,
            rt,
            save_receiver: None,
            remove_receiver: None,
            cover_receiver: None,
            dialog_receiver: None,
        }
    }

    /// Flip and persist the theme preference
    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.prefs.theme = self.prefs.theme.toggled();
        apply_theme(ctx, self.prefs.theme);

        if let Err(e) = self.prefs.save(&self.config.paths.data_dir) {
            error!("Failed to save preferences: {}", e);
        }
    }

    /// Bump the persisted add-button click counter
    fn record_add_click(&mut self) {
        self.prefs.add_clicks += 1;

        if let Err(e) = self.prefs.save(&self.config.paths.data_dir) {
            warn!("Failed to save preferences: {}", e);
        }
    }

    /// Handle library action
    fn handle_library_action(&mut self, action: LibraryAction) {
        match action {
            LibraryAction::AddGame => {
                self.record_add_click();
                self.editor = Some(EditorView::for_new());
            }
            LibraryAction::EditGame(id) => {
                if let Some(game) = self.store.get(id) {
                    let existing_cover = self.store.cover_file_for(game);
                    let editor = EditorView::for_game(game, existing_cover);
                    self.editor = Some(editor);
                }
            }
            LibraryAction::DeleteGame(id) => {
                self.confirm_delete = Some(id);
            }
            LibraryAction::CycleStatus(id) => match self.store.cycle_status(id) {
                Ok(status) => info!("Game {} is now {}", id, status.label()),
                Err(e) => error!("Failed to cycle status: {}", e),
            },
            LibraryAction::SetRating(id, rating) => {
                if let Err(e) = self.store.set_rating(id, rating) {
                    error!("Failed to set rating: {}", e);
                }
            }
        }
    }

    /// Handle editor action
    fn handle_editor_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::PickCover => self.open_cover_dialog(),
            EditorAction::Save => self.start_save(),
            EditorAction::Cancel => self.close_editor(),
        }
    }

    /// Close the editor, discarding any staged cover
    fn close_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            if let Some(staged) = editor.staged_cover() {
                if staged.exists() {
                    if let Err(e) = fs::remove_file(staged) {
                        warn!("Failed to delete staged cover: {}", e);
                    }
                }
            }
        }
    }

    /// Open the native file picker on a helper thread
    fn open_cover_dialog(&mut self) {
        if self.dialog_receiver.is_some() {
            return;
        }

        let (tx, rx) = channel();
        self.dialog_receiver = Some(rx);

        thread::spawn(move || {
            let picked = rfd::FileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                .pick_file();

            let _ = tx.send(picked);
        });
    }

    /// Check for a file dialog result
    fn check_dialog_results(&mut self) {
        let Some(receiver) = &self.dialog_receiver else {
            return;
        };

        match receiver.try_recv() {
            Ok(Some(path)) => {
                self.dialog_receiver = None;
                self.begin_cover_processing(path);
            }
            Ok(None) => {
                // Dialog canceled
                self.dialog_receiver = None;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {}
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.dialog_receiver = None;
            }
        }
    }

    /// Process a picked cover in the background
    fn begin_cover_processing(&mut self, input: PathBuf) {
        let Some(editor) = &mut self.editor else {
            return;
        };

        editor.set_progress(Some((0.1, "Loading image...".to_string())));

        let (tx, rx) = channel();
        self.cover_receiver = Some(rx);

        let staged = self.store.covers_dir().join(covers::STAGED_COVER);

        self.rt.spawn(async move {
            let _ = tx.send(CoverStatus::Progress {
                fraction: 0.3,
                message: "Loading image...".to_string(),
            });

            // Simulated loading step (wait a bit)
            tokio::time::sleep(Duration::from_millis(200)).await;

            let _ = tx.send(CoverStatus::Progress {
                fraction: 0.6,
                message: "Processing image...".to_string(),
            });

            match covers::process_card_cover(&input, &staged) {
                Ok(path) => {
                    let _ = tx.send(CoverStatus::Progress {
                        fraction: 1.0,
                        message: "Cover ready".to_string(),
                    });
                    let _ = tx.send(CoverStatus::Ready { staged: path });
                }
                Err(e) => {
                    let _ = tx.send(CoverStatus::Failed {
                        error: e.to_string(),
                    });
                }
            }
        });
    }

    /// Check for cover pipeline updates
    fn check_cover_status(&mut self) {
        let mut collected_statuses = Vec::new();
        let mut done = false;

        if let Some(receiver) = &self.cover_receiver {
            loop {
                match receiver.try_recv() {
                    Ok(status) => collected_statuses.push(status),
                    Err(std::sync::mpsc::TryRecvError::Empty) => break,
                    Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                        done = true;
                        break;
                    }
                }
            }
        }

        for status in collected_statuses {
            let Some(editor) = &mut self.editor else {
                continue;
            };

            match status {
                CoverStatus::Progress { fraction, message } => {
                    editor.set_progress(Some((fraction, message)));
                }
                CoverStatus::Ready { staged } => {
                    info!("Cover staged at {}", staged.display());
                    editor.set_staged_cover(staged);
                    done = true;
                }
                CoverStatus::Failed { error } => {
                    error!("Cover processing failed: {}", error);
                    editor.set_error(Some(error));
                    done = true;
                }
            }
        }

        if done {
            self.cover_receiver = None;
        }
    }

    /// Kick off the simulated save delay
    fn start_save(&mut self) {
        let Some(editor) = &mut self.editor else {
            return;
        };

        editor.set_saving(true);

        let (tx, rx) = channel();
        self.save_receiver = Some(rx);

        self.rt.spawn(async move {
            // Simulated save time (wait a bit)
            tokio::time::sleep(Duration::from_millis(800)).await;
            let _ = tx.send(());
        });
    }

    /// Check whether the simulated save has elapsed
    fn check_save_result(&mut self) {
        let Some(receiver) = &self.save_receiver else {
            return;
        };

        match receiver.try_recv() {
            Ok(()) => {
                self.save_receiver = None;
                self.apply_save();
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {}
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.save_receiver = None;
            }
        }
    }

    /// Apply the editor contents to the store
    fn apply_save(&mut self) {
        let Some(mut editor) = self.editor.take() else {
            return;
        };

        match self.commit_editor(&editor) {
            Ok(id) => {
                info!("Saved game {}", id);
            }
            Err(e) => {
                error!("Failed to save game: {}", e);
                editor.set_saving(false);
                editor.set_error(Some(e.to_string()));
                self.editor = Some(editor);
            }
        }
    }

    /// Write the editor contents through the store
    fn commit_editor(&mut self, editor: &EditorView) -> anyhow::Result<i64> {
        let id = match editor.game_id() {
            Some(id) => {
                self.store
                    .update(id, editor.title(), editor.status(), editor.rating())?;
                id
            }
            None => self
                .store
                .add(editor.title(), editor.status(), editor.rating())?,
        };

        if let Some(staged) = editor.staged_cover() {
            let dest = self.store.cover_path(id);
            fs::rename(staged, &dest)?;

            let file_name = format!("{}_cover.jpg", id);
            self.store.set_cover(id, &file_name)?;
            self.library_view.clear_cover_texture(id);
        }

        Ok(id)
    }

    /// Kick off the pre-removal delay
    fn start_removal(&mut self, id: i64) {
        self.removing = Some(id);

        let (tx, rx) = channel();
        self.remove_receiver = Some(rx);

        self.rt.spawn(async move {
            // Short removal animation window (wait a bit)
            tokio::time::sleep(Duration::from_millis(300)).await;
            let _ = tx.send(id);
        });
    }

    /// Check whether the pre-removal delay has elapsed
    fn check_removal_result(&mut self) {
        let Some(receiver) = &self.remove_receiver else {
            return;
        };

        match receiver.try_recv() {
            Ok(id) => {
                self.remove_receiver = None;
                self.removing = None;

                match self.store.remove(id) {
                    Ok(removed) => {
                        self.library_view.clear_cover_texture(removed.id);
                    }
                    Err(e) => error!("Failed to remove game: {}", e),
                }
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {}
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.remove_receiver = None;
                self.removing = None;
            }
        }
    }

    /// Delete confirmation dialog
    fn show_confirm_delete(&mut self, ctx: &egui::Context) {
        let Some(id) = self.confirm_delete else {
            return;
        };

        let title = self
            .store
            .get(id)
            .map(|game| game.title.clone())
            .unwrap_or_default();

        let mut confirmed = false;
        let mut canceled = false;

        egui::Window::new("Delete Game")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{}\" from your shelf?", title));
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let delete = egui::Button::new(
                        egui::RichText::new("Delete").color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_rgb(192, 57, 43));
                    if ui.add(delete).clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        canceled = true;
                    }
                });
            });

        if confirmed {
            self.confirm_delete = None;
            self.start_removal(id);
        } else if canceled {
            self.confirm_delete = None;
        }
    }
}

impl eframe::App for GameShelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background task results
        self.check_dialog_results();
        self.check_cover_status();
        self.check_save_result();
        self.check_removal_result();

        // Variable to store library action
        let mut library_action = None;

        // Variable to store theme toggle
        let mut theme_clicked = false;

        // Main frame
        egui::CentralPanel::default().show(ctx, |ui| {
            // Top bar
            ui.horizontal(|ui| {
                ui.heading("Game Shelf");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = match self.prefs.theme {
                        Theme::Dark => "Light Mode",
                        Theme::Light => "Dark Mode",
                    };
                    if ui.button(label).clicked() {
                        theme_clicked = true;
                    }
                });
            });

            ui.separator();

            // Show library view
            self.library_view
                .show(ui, &self.store, self.removing, |action| {
                    library_action = Some(action);
                });
        });

        // Handle top bar and library actions after the UI code
        if theme_clicked {
            self.toggle_theme(ctx);
        }

        if let Some(action) = library_action {
            self.handle_library_action(action);
        }

        // Editor dialog
        let mut editor_action = None;
        if let Some(editor) = &mut self.editor {
            editor.show(ctx, |action| {
                editor_action = Some(action);
            });
        }

        if let Some(action) = editor_action {
            self.handle_editor_action(action);
        }

        // Delete confirmation dialog
        self.show_confirm_delete(ctx);

        // Request a redraw to keep polling background task results
        ctx.request_repaint();
    }
}

/// Apply the persisted theme to the egui context
fn apply_theme(ctx: &egui::Context, theme: Theme) {
    match theme {
        Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
        Theme::Light => ctx.set_visuals(egui::Visuals::light()),
    }
}
