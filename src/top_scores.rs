/// One row of the top-score table.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug, serde::Serialize, serde::Deserialize,
)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
    pub rows_cleared: u32,
    pub datetime: String,
}

/// The best scores so far, highest first.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TopScores {
    entries: Vec<ScoreEntry>,
}

impl ScoreEntry {
    pub const UNKNOWN_NAME: &'static str = "UNKNOWN";
    pub const MAX_NAME_LEN: usize = 16;

    pub fn new(name: &str, score: u32, level: u32, rows_cleared: u32) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            Self::UNKNOWN_NAME.to_owned()
        } else {
            name.chars().take(Self::MAX_NAME_LEN).collect()
        };
        Self {
            name,
            score,
            level,
            rows_cleared,
            datetime: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl TopScores {
    pub const MAX_ENTRIES: usize = 10;

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Where a score would be placed, or `None` if it does not make it onto the table.
    ///
    /// A score outranks an entry only if strictly greater, so ties go below existing entries.
    pub fn rank(&self, score: u32) -> Option<usize> {
        match self.entries.iter().position(|entry| score > entry.score) {
            Some(i) => Some(i),
            None if self.entries.len() < Self::MAX_ENTRIES => Some(self.entries.len()),
            None => None,
        }
    }

    /// Inserts an entry at its rank, dropping whatever falls off the end of the table.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self.rank(entry.score)?;
        self.entries.insert(rank, entry);
        self.entries.truncate(Self::MAX_ENTRIES);
        Some(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> ScoreEntry {
        ScoreEntry::new("player", score, 1, 0)
    }

    #[test]
    fn empty_table_accepts_anything() {
        let mut scores = TopScores::default();
        assert_eq!(scores.rank(0), Some(0));
        assert_eq!(scores.insert(entry(0)), Some(0));
        assert_eq!(scores.entries().len(), 1);
    }

    #[test]
    fn entries_stay_sorted_descending() {
        let mut scores = TopScores::default();
        for score in [300, 1600, 100, 800, 200] {
            scores.insert(entry(score));
        }
        let sorted: Vec<u32> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(sorted, [1600, 800, 300, 200, 100]);
    }

    #[test]
    fn ties_rank_below_existing_entries() {
        let mut scores = TopScores::default();
        let mut first = entry(500);
        first.name = "first".to_owned();
        scores.insert(first);
        assert_eq!(scores.insert(entry(500)), Some(1));
        assert_eq!(scores.entries()[0].name, "first");
    }

    #[test]
    fn full_table_keeps_ten_best() {
        let mut scores = TopScores::default();
        for score in (1..=10).map(|n| n * 100) {
            scores.insert(entry(score));
        }
        assert_eq!(scores.rank(100), None);
        assert_eq!(scores.insert(entry(50)), None);
        assert_eq!(scores.insert(entry(150)), Some(9));
        assert_eq!(scores.entries().len(), TopScores::MAX_ENTRIES);
        assert_eq!(scores.entries().last().map(|e| e.score), Some(150));
    }

    #[test]
    fn blank_names_become_unknown() {
        assert_eq!(ScoreEntry::new("   ", 10, 1, 1).name, "UNKNOWN");
        assert_eq!(ScoreEntry::new(" ada ", 10, 1, 1).name, "ada");
        let long = "x".repeat(40);
        assert_eq!(ScoreEntry::new(&long, 10, 1, 1).name.len(), ScoreEntry::MAX_NAME_LEN);
    }
}
