//! Playlists as returned by a backend search, and best-match ranking.

use serde::{Deserialize, Serialize};

/// A playlist known to the continuous backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Backend-stable identifier (persistent id).
    pub id: String,
    pub name: String,
}

impl Playlist {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Pick the candidate that best matches `query`.
///
/// Ranking, case-insensitive: exact name, then prefix, then substring, then
/// anything else the search returned. Ties go to the shorter name, then to
/// the earlier candidate. Returns `None` only when `candidates` is empty.
#[must_use]
pub fn best_match<'a>(query: &str, candidates: &'a [Playlist]) -> Option<&'a Playlist> {
    let query = query.trim().to_lowercase();
    candidates
        .iter()
        .enumerate()
        .min_by_key(|(position, playlist)| {
            let name = playlist.name.trim().to_lowercase();
            let rank = if name == query {
                0
            } else if name.starts_with(&query) {
                1
            } else if name.contains(&query) {
                2
            } else {
                3
            };
            (rank, name.len(), *position)
        })
        .map(|(_, playlist)| playlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Playlist> {
        vec![
            Playlist::new("A1", "Morning Jazz Classics"),
            Playlist::new("B2", "Jazz"),
            Playlist::new("C3", "Jazz Evenings"),
        ]
    }

    #[test]
    fn should_prefer_exact_match() {
        let list = candidates();
        assert_eq!(best_match("jazz", &list).unwrap().id, "B2");
    }

    #[test]
    fn should_prefer_prefix_over_substring() {
        let list = vec![
            Playlist::new("A1", "Morning Jazz"),
            Playlist::new("C3", "Jazz Evenings"),
        ];
        assert_eq!(best_match("Jazz", &list).unwrap().id, "C3");
    }

    #[test]
    fn should_fall_back_to_first_candidate_without_textual_match() {
        let list = vec![
            Playlist::new("X1", "Focus"),
            Playlist::new("X2", "Sleep"),
        ];
        assert_eq!(best_match("ambient", &list).unwrap().id, "X1");
    }

    #[test]
    fn should_return_none_for_empty_candidates() {
        assert!(best_match("jazz", &[]).is_none());
    }
}
