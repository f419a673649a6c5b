use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use super::entry::{GameEntry, PlayStatus, StatusFilter, MAX_RATING};

/// File name of the persisted collection
const GAMES_FILE: &str = "games.json";

/// Library statistics shown above the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    /// Number of tracked games
    pub total: usize,
    /// Number of games marked played
    pub played: usize,
}

/// Persistent store for the game collection
///
/// The whole collection is rewritten to disk after every mutation. Access is
/// single-threaded; background tasks only signal the UI, they never touch the
/// store directly.
pub struct LibraryStore {
    /// Base directory for persisted state
    data_dir: PathBuf,
    /// Loaded collection
    games: Vec<GameEntry>,
}

impl LibraryStore {
    /// Create a store rooted at the given data directory
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let covers_dir = data_dir.join("covers");

        for dir in [&data_dir, &covers_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }

        Ok(Self {
            data_dir,
            games: Vec::new(),
        })
    }

    /// Path of the persisted collection
    fn games_path(&self) -> PathBuf {
        self.data_dir.join(GAMES_FILE)
    }

    /// Directory for cached cover images
    pub fn covers_dir(&self) -> PathBuf {
        self.data_dir.join("covers")
    }

    /// Load the collection from disk
    pub fn load(&mut self) -> Result<()> {
        let path = self.games_path();

        if !path.exists() {
            info!("No game collection at {}, starting empty", path.display());
            return Ok(());
        }

        let json_str = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read game collection: {}", path.display()))?;

        self.games = serde_json::from_str(&json_str)
            .with_context(|| format!("Failed to parse game collection: {}", path.display()))?;

        info!("Loaded {} games from {}", self.games.len(), path.display());
        Ok(())
    }

    /// Rewrite the whole collection to disk
    fn save(&self) -> Result<()> {
        let path = self.games_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json_str = serde_json::to_string_pretty(&self.games)
            .context("Failed to serialize game collection")?;

        fs::write(&path, json_str)
            .with_context(|| format!("Failed to write game collection: {}", path.display()))?;

        Ok(())
    }

    /// Allocate a unique ID from the current time
    fn next_id(&self) -> i64 {
        let mut id = Utc::now().timestamp_millis();

        // Two adds on the same millisecond must not collide
        while self.games.iter().any(|game| game.id == id) {
            id += 1;
        }

        id
    }

    /// Find a game by ID
    fn entry_mut(&mut self, id: i64) -> Result<&mut GameEntry> {
        self.games
            .iter_mut()
            .find(|game| game.id == id)
            .ok_or_else(|| anyhow::anyhow!("No game with id {}", id))
    }

    /// Add a game and return its ID
    pub fn add(&mut self, title: &str, status: PlayStatus, rating: u8) -> Result<i64> {
        let title = title.trim();

        if title.is_empty() {
            bail!("Game title must not be empty");
        }

        if rating > MAX_RATING {
            bail!("Rating must be between 0 and {}", MAX_RATING);
        }

        let id = self.next_id();

        self.games.push(GameEntry {
            id,
            title: title.to_string(),
            status,
            rating,
            cover: None,
            added_at: Some(Utc::now().timestamp()),
        });

        self.save()?;

        info!("Added game '{}' ({})", title, id);
        Ok(id)
    }

    /// Replace title, status and rating of an existing game
    pub fn update(&mut self, id: i64, title: &str, status: PlayStatus, rating: u8) -> Result<()> {
        let title = title.trim();

        if title.is_empty() {
            bail!("Game title must not be empty");
        }

        if rating > MAX_RATING {
            bail!("Rating must be between 0 and {}", MAX_RATING);
        }

        let entry = self.entry_mut(id)?;
        entry.title = title.to_string();
        entry.status = status;
        entry.rating = rating;

        self.save()?;

        info!("Updated game '{}' ({})", title, id);
        Ok(())
    }

    /// Set the play status of a game
    pub fn set_status(&mut self, id: i64, status: PlayStatus) -> Result<()> {
        self.entry_mut(id)?.status = status;
        self.save()
    }

    /// Advance a game to the next status in the cycle
    pub fn cycle_status(&mut self, id: i64) -> Result<PlayStatus> {
        let entry = self.entry_mut(id)?;
        let next = entry.status.next();
        entry.status = next;

        self.save()?;
        Ok(next)
    }

    /// Set the star rating of a game
    pub fn set_rating(&mut self, id: i64, rating: u8) -> Result<()> {
        if rating > MAX_RATING {
            bail!("Rating must be between 0 and {}", MAX_RATING);
        }

        self.entry_mut(id)?.rating = rating;
        self.save()
    }

    /// Record the cover file name of a game
    pub fn set_cover(&mut self, id: i64, file_name: &str) -> Result<()> {
        self.entry_mut(id)?.cover = Some(file_name.to_string());
        self.save()
    }

    /// Remove a game and its cached cover
    pub fn remove(&mut self, id: i64) -> Result<GameEntry> {
        let index = self
            .games
            .iter()
            .position(|game| game.id == id)
            .ok_or_else(|| anyhow::anyhow!("No game with id {}", id))?;

        let removed = self.games.remove(index);
        self.save()?;

        if let Some(cover) = self.cover_file_for(&removed) {
            if cover.exists() {
                if let Err(e) = fs::remove_file(&cover) {
                    warn!("Failed to delete cover {}: {}", cover.display(), e);
                }
            }
        }

        info!("Removed game '{}' ({})", removed.title, removed.id);
        Ok(removed)
    }

    /// Get a game by ID
    pub fn get(&self, id: i64) -> Option<&GameEntry> {
        self.games.iter().find(|game| game.id == id)
    }

    /// All tracked games
    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    /// Games passing the given filter and title query
    pub fn filtered(&self, filter: StatusFilter, query: &str) -> Vec<&GameEntry> {
        let query = query.trim().to_lowercase();

        self.games
            .iter()
            .filter(|game| filter.matches(game))
            .filter(|game| query.is_empty() || game.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Library statistics
    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            total: self.games.len(),
            played: self
                .games
                .iter()
                .filter(|game| game.status == PlayStatus::Played)
                .count(),
        }
    }

    /// Canonical cover path for a game ID
    pub fn cover_path(&self, id: i64) -> PathBuf {
        self.covers_dir().join(format!("{}_cover.jpg", id))
    }

    /// Full path of a game's recorded cover, if it has one
    pub fn cover_file_for(&self, game: &GameEntry) -> Option<PathBuf> {
        game.cover
            .as_ref()
            .map(|file_name| self.covers_dir().join(file_name))
    }

    /// Whether a game has a cover image on disk
    pub fn has_cover(&self, game: &GameEntry) -> bool {
        self.cover_file_for(game).map_or(false, |path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (tempfile::TempDir, LibraryStore) {
        let dir = tempdir().unwrap();
        let mut store = LibraryStore::new(dir.path().to_path_buf()).unwrap();
        store.load().unwrap();
        (dir, store)
    }

    #[test]
    fn test_add_increases_collection_size() {
        let (_dir, mut store) = test_store();

        assert_eq!(store.stats().total, 0);
        store.add("Hades", PlayStatus::Playing, 4).unwrap();
        assert_eq!(store.stats().total, 1);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let (_dir, mut store) = test_store();

        assert!(store.add("", PlayStatus::ToPlay, 0).is_err());
        assert!(store.add("   ", PlayStatus::ToPlay, 0).is_err());
        assert_eq!(store.stats().total, 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let (_dir, mut store) = test_store();

        // Adds land on the same millisecond often enough in a tight loop
        let mut ids = Vec::new();
        for i in 0..20 {
            ids.push(store.add(&format!("Game {}", i), PlayStatus::ToPlay, 0).unwrap());
        }

        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_remove_deletes_exactly_that_game() {
        let (_dir, mut store) = test_store();

        let keep = store.add("Keep Me", PlayStatus::ToPlay, 0).unwrap();
        let drop = store.add("Drop Me", PlayStatus::ToPlay, 0).unwrap();

        let removed = store.remove(drop).unwrap();
        assert_eq!(removed.id, drop);
        assert!(store.get(drop).is_none());
        assert!(store.get(keep).is_some());
        assert_eq!(store.stats().total, 1);
    }

    #[test]
    fn test_remove_unknown_id_fails() {
        let (_dir, mut store) = test_store();
        assert!(store.remove(42).is_err());
    }

    #[test]
    fn test_set_status_replaces_field() {
        let (_dir, mut store) = test_store();

        let id = store.add("Sable", PlayStatus::ToPlay, 0).unwrap();
        store.set_status(id, PlayStatus::Played).unwrap();

        assert_eq!(store.get(id).unwrap().status, PlayStatus::Played);
        assert!(store.set_status(99, PlayStatus::Played).is_err());
    }

    #[test]
    fn test_cover_path_uses_id_naming() {
        let (_dir, mut store) = test_store();

        let id = store.add("Ori", PlayStatus::Playing, 0).unwrap();
        assert!(store
            .cover_path(id)
            .ends_with(format!("covers/{}_cover.jpg", id)));

        // Recorded cover without a file on disk does not count
        store.set_cover(id, &format!("{}_cover.jpg", id)).unwrap();
        let game = store.get(id).unwrap();
        assert!(store.cover_file_for(game).is_some());
        assert!(!store.has_cover(game));
    }

    #[test]
    fn test_cycle_status_three_times_is_identity() {
        let (_dir, mut store) = test_store();

        let id = store.add("Tunic", PlayStatus::Playing, 0).unwrap();
        store.cycle_status(id).unwrap();
        store.cycle_status(id).unwrap();
        store.cycle_status(id).unwrap();

        assert_eq!(store.get(id).unwrap().status, PlayStatus::Playing);
    }

    #[test]
    fn test_set_rating_validates_range() {
        let (_dir, mut store) = test_store();

        let id = store.add("Hollow Knight", PlayStatus::Played, 0).unwrap();
        store.set_rating(id, 5).unwrap();
        assert_eq!(store.get(id).unwrap().rating, 5);

        assert!(store.set_rating(id, 6).is_err());
        assert_eq!(store.get(id).unwrap().rating, 5);
    }

    #[test]
    fn test_filtered_returns_only_matching_status() {
        let (_dir, mut store) = test_store();

        store.add("Backlog Game", PlayStatus::ToPlay, 0).unwrap();
        store.add("Current Game", PlayStatus::Playing, 0).unwrap();
        store.add("Done Game", PlayStatus::Played, 5).unwrap();

        let playing = store.filtered(StatusFilter::Only(PlayStatus::Playing), "");
        assert_eq!(playing.len(), 1);
        assert_eq!(playing[0].title, "Current Game");

        let all = store.filtered(StatusFilter::All, "");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_filtered_applies_title_query() {
        let (_dir, mut store) = test_store();

        store.add("Dark Souls", PlayStatus::Played, 5).unwrap();
        store.add("Darkest Dungeon", PlayStatus::ToPlay, 0).unwrap();
        store.add("Stardew Valley", PlayStatus::Playing, 4).unwrap();

        let matches = store.filtered(StatusFilter::All, "dark");
        assert_eq!(matches.len(), 2);

        let matches = store.filtered(StatusFilter::Only(PlayStatus::Played), "dark");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Dark Souls");
    }

    #[test]
    fn test_save_then_load_is_identity() {
        let dir = tempdir().unwrap();

        let (first_id, second_id) = {
            let mut store = LibraryStore::new(dir.path().to_path_buf()).unwrap();
            store.load().unwrap();
            let first = store.add("Disco Elysium", PlayStatus::Played, 5).unwrap();
            let second = store.add("Factorio", PlayStatus::Playing, 4).unwrap();
            store.set_cover(first, &format!("{}_cover.jpg", first)).unwrap();
            (first, second)
        };

        let mut reloaded = LibraryStore::new(dir.path().to_path_buf()).unwrap();
        reloaded.load().unwrap();

        assert_eq!(reloaded.stats().total, 2);

        let first = reloaded.get(first_id).unwrap();
        assert_eq!(first.title, "Disco Elysium");
        assert_eq!(first.status, PlayStatus::Played);
        assert_eq!(first.rating, 5);
        assert_eq!(first.cover.as_deref(), Some(format!("{}_cover.jpg", first_id).as_str()));

        let second = reloaded.get(second_id).unwrap();
        assert_eq!(second.title, "Factorio");
        assert_eq!(second.status, PlayStatus::Playing);
    }

    #[test]
    fn test_stats_counts_played_games() {
        let (_dir, mut store) = test_store();

        store.add("One", PlayStatus::Played, 3).unwrap();
        store.add("Two", PlayStatus::Played, 4).unwrap();
        store.add("Three", PlayStatus::ToPlay, 0).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.played, 2);
    }
}
