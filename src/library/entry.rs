use serde::{Deserialize, Serialize};

/// Play status of a tracked game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayStatus {
    /// On the backlog
    ToPlay,
    /// Currently being played
    Playing,
    /// Finished, or shelved after playing
    Played,
}

impl PlayStatus {
    /// All statuses in cycle order
    pub const ALL: [PlayStatus; 3] = [PlayStatus::ToPlay, PlayStatus::Playing, PlayStatus::Played];

    /// Next status in the to-play -> playing -> played cycle
    pub fn next(self) -> Self {
        match self {
            PlayStatus::ToPlay => PlayStatus::Playing,
            PlayStatus::Playing => PlayStatus::Played,
            PlayStatus::Played => PlayStatus::ToPlay,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            PlayStatus::ToPlay => "To Play",
            PlayStatus::Playing => "Playing",
            PlayStatus::Played => "Played",
        }
    }
}

/// Status filter applied to the library view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Show every game
    All,
    /// Show only games with the given status
    Only(PlayStatus),
}

impl StatusFilter {
    /// Display label for the filter bar
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Games",
            StatusFilter::Only(status) => status.label(),
        }
    }

    /// Whether a game passes this filter
    pub fn matches(self, game: &GameEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => game.status == status,
        }
    }
}

/// Highest star rating a game can have
pub const MAX_RATING: u8 = 5;

/// Short label for a 0-5 star rating
pub fn rating_label(rating: u8) -> &'static str {
    match rating {
        0 => "Not rated",
        1 => "Awful",
        2 => "Poor",
        3 => "Okay",
        4 => "Good",
        _ => "Excellent",
    }
}

/// One tracked game
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameEntry {
    /// Unique ID (creation time in milliseconds)
    pub id: i64,
    /// Game title
    pub title: String,
    /// Play status
    pub status: PlayStatus,
    /// Star rating, 0-5 (0 means not rated)
    #[serde(default)]
    pub rating: u8,
    /// Cover image file name, relative to the covers directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Creation time (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<i64>,
}

impl GameEntry {
    /// Formatted creation date, if one was recorded
    pub fn added_date(&self) -> Option<String> {
        self.added_at.and_then(|ts| {
            chrono::NaiveDateTime::from_timestamp_opt(ts, 0)
                .map(|dt| dt.format("%B %d, %Y").to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_returns_to_start() {
        for status in PlayStatus::ALL {
            assert_eq!(status.next().next().next(), status);
        }
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PlayStatus::ToPlay).unwrap(),
            "\"to-play\""
        );
        assert_eq!(
            serde_json::to_string(&PlayStatus::Playing).unwrap(),
            "\"playing\""
        );
        assert_eq!(
            serde_json::to_string(&PlayStatus::Played).unwrap(),
            "\"played\""
        );
    }

    #[test]
    fn test_filter_matches_only_its_status() {
        let game = GameEntry {
            id: 1,
            title: "Outer Wilds".to_string(),
            status: PlayStatus::Playing,
            rating: 0,
            cover: None,
            added_at: None,
        };

        assert!(StatusFilter::All.matches(&game));
        assert!(StatusFilter::Only(PlayStatus::Playing).matches(&game));
        assert!(!StatusFilter::Only(PlayStatus::Played).matches(&game));
    }

    #[test]
    fn test_missing_rating_reads_as_unrated() {
        let json = r#"{"id": 10, "title": "Celeste", "status": "played"}"#;
        let game: GameEntry = serde_json::from_str(json).unwrap();
        assert_eq!(game.rating, 0);
        assert_eq!(rating_label(game.rating), "Not rated");
    }

    #[test]
    fn test_rating_labels_cover_all_values() {
        assert_eq!(rating_label(1), "Awful");
        assert_eq!(rating_label(3), "Okay");
        assert_eq!(rating_label(MAX_RATING), "Excellent");
    }
}
