pub mod entry;
pub mod prefs;
pub mod store;

pub use entry::{rating_label, GameEntry, PlayStatus, StatusFilter, MAX_RATING};
pub use prefs::{Preferences, Theme};
pub use store::{LibraryStats, LibraryStore};
