/// Catalog Index
///
/// Per-item side table joined back onto ranked matrix rows by position.
use crate::models::{GameRow, RecommendedGame};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub image: String,
    pub rating: f32,
    pub ratings_count: u64,
    /// Pipe-joined genre names
    pub genres: String,
    /// Pipe-joined platform names
    pub platforms: String,
}

impl CatalogEntry {
    pub fn from_row(row: &GameRow) -> Self {
        Self {
            name: row.name.clone(),
            image: row.image.clone(),
            rating: row.rating,
            ratings_count: row.ratings_count,
            genres: row.genres.join("|"),
            platforms: row.platforms.join("|"),
        }
    }

    pub fn recommend(&self, score: f32) -> RecommendedGame {
        RecommendedGame {
            name: self.name.clone(),
            image: self.image.clone(),
            rating: self.rating,
            genres: self.genres.clone(),
            platforms: self.platforms.clone(),
            score,
        }
    }
}

/// Entries in feature-matrix row order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
}

impl CatalogIndex {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn from_rows(rows: &[GameRow]) -> Self {
        Self::new(rows.iter().map(CatalogEntry::from_row).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&CatalogEntry> {
        self.entries.get(row)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Raw ratings in row order (popularity input of the ranker)
    pub fn ratings(&self) -> Vec<f32> {
        self.entries.iter().map(|e| e.rating).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_row_joins_lists() {
        let row = GameRow {
            name: "Portal 2".to_string(),
            image: "https://img.example/portal2.jpg".to_string(),
            rating: 4.6,
            ratings_count: 5400,
            genres: vec!["Shooter".to_string(), "Puzzle".to_string()],
            platforms: vec!["PC".to_string(), "Xbox 360".to_string()],
            tags: vec!["Co-op".to_string()],
            features: "shooter puzzle pc xbox_360 co-op".to_string(),
        };

        let entry = CatalogEntry::from_row(&row);
        assert_eq!(entry.genres, "Shooter|Puzzle");
        assert_eq!(entry.platforms, "PC|Xbox 360");

        let game = entry.recommend(0.75);
        assert_eq!(game.name, "Portal 2");
        assert_eq!(game.score, 0.75);
        assert_eq!(game.genres, "Shooter|Puzzle");
    }

    #[test]
    fn test_ratings_follow_row_order() {
        let index = CatalogIndex::new(vec![
            CatalogEntry {
                name: "A".into(),
                image: String::new(),
                rating: 5.0,
                ratings_count: 0,
                genres: String::new(),
                platforms: String::new(),
            },
            CatalogEntry {
                name: "B".into(),
                image: String::new(),
                rating: 1.0,
                ratings_count: 0,
                genres: String::new(),
                platforms: String::new(),
            },
        ]);

        assert_eq!(index.ratings(), vec![5.0, 1.0]);
        assert_eq!(index.get(1).map(|e| e.name.as_str()), Some("B"));
        assert!(index.get(2).is_none());
    }
}
