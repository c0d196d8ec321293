/// Raw record ingestion
///
/// Flattens RAWG-style game records into `GameRow`s:
/// - `genres[].name`, `platforms[].platform.name`, `tags[].name`
/// - non-object list entries and entries without a name are skipped
/// - records without a non-empty name are dropped, duplicate names keep the first record
use crate::error::{AppError, Result};
use crate::models::GameRow;
use content_vector::feature_string;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// Names under `key` for every object entry of the list at `field`
fn named_entries(record: &Value, field: &str, key: &str) -> Vec<String> {
    record
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object()?.get(key)?.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Platform names nest one level deeper: `platforms[].platform.name`
fn platform_names(record: &Value) -> Vec<String> {
    record
        .get("platforms")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("platform")?.get("name")?.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Flatten one raw record. Returns `None` when it has no usable name.
pub fn flatten_record(record: &Value) -> Option<GameRow> {
    let name = record.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let rating = record
        .get("rating")
        .and_then(Value::as_f64)
        .map(|r| r as f32)
        .filter(|r| r.is_finite() && *r >= 0.0)
        .unwrap_or(0.0);
    let ratings_count = record
        .get("ratings_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let genres = named_entries(record, "genres", "name");
    let platforms = platform_names(record);
    let tags = named_entries(record, "tags", "name");
    let features = feature_string(&genres, &platforms, &tags);

    Some(GameRow {
        name: name.to_string(),
        image: record
            .get("background_image")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        rating,
        ratings_count,
        genres,
        platforms,
        tags,
        features,
    })
}

/// Flatten and deduplicate a batch of raw records, preserving input order.
pub fn prepare_rows(records: &[Value]) -> Vec<GameRow> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        match flatten_record(record) {
            Some(row) if seen.insert(row.name.clone()) => rows.push(row),
            Some(row) => {
                debug!(name = %row.name, "Dropping duplicate game");
                dropped += 1;
            }
            None => dropped += 1,
        }
    }

    info!(
        input = records.len(),
        kept = rows.len(),
        dropped = dropped,
        "Prepared catalog rows"
    );

    rows
}

/// Read a JSON array of raw records
pub fn read_raw_records(path: &Path) -> Result<Vec<Value>> {
    let reader = BufReader::new(File::open(path)?);
    let parsed: Value = serde_json::from_reader(reader)?;
    match parsed {
        Value::Array(records) => Ok(records),
        _ => Err(AppError::BadRequest(format!(
            "{} must contain a JSON array of game records",
            path.display()
        ))),
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<GameRow>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_rows(path: &Path, rows: &[GameRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rawg_record(name: &str, rating: f64) -> Value {
        json!({
            "name": name,
            "background_image": format!("https://img.example/{}.jpg", name),
            "rating": rating,
            "ratings_count": 120,
            "genres": [{"name": "Action"}, {"name": "Role Playing Games"}],
            "platforms": [
                {"platform": {"name": "PC"}},
                {"platform": {"name": "PlayStation 5"}}
            ],
            "tags": [{"name": "Singleplayer"}, {"name": "action"}]
        })
    }

    #[test]
    fn test_flatten_record() {
        let row = flatten_record(&rawg_record("Elden Ring", 4.4)).unwrap();

        assert_eq!(row.name, "Elden Ring");
        assert_eq!(row.image, "https://img.example/Elden Ring.jpg");
        assert!((row.rating - 4.4).abs() < 1e-6);
        assert_eq!(row.ratings_count, 120);
        assert_eq!(row.genres, vec!["Action", "Role Playing Games"]);
        assert_eq!(row.platforms, vec!["PC", "PlayStation 5"]);
        assert_eq!(
            row.features,
            "action role_playing_games pc playstation_5 singleplayer action"
        );
    }

    #[test]
    fn test_flatten_tolerates_missing_and_malformed_fields() {
        let row = flatten_record(&json!({
            "name": "  Tetris  ",
            "rating": null,
            "genres": null,
            "platforms": ["PC", {"platform": {}}, {"platform": {"name": "Game Boy"}}],
            "tags": [42, {"slug": "no-name"}]
        }))
        .unwrap();

        assert_eq!(row.name, "Tetris");
        assert_eq!(row.rating, 0.0);
        assert_eq!(row.ratings_count, 0);
        assert!(row.genres.is_empty());
        assert_eq!(row.platforms, vec!["Game Boy"]);
        assert!(row.tags.is_empty());
        assert_eq!(row.features, "game_boy");
        assert_eq!(row.image, "");
    }

    #[test]
    fn test_records_without_name_are_dropped() {
        assert!(flatten_record(&json!({"rating": 4.0})).is_none());
        assert!(flatten_record(&json!({"name": "   "})).is_none());
        assert!(flatten_record(&json!({"name": 12})).is_none());
    }

    #[test]
    fn test_negative_rating_is_clamped_to_zero() {
        let row = flatten_record(&json!({"name": "Broken", "rating": -3.0})).unwrap();
        assert_eq!(row.rating, 0.0);
    }

    #[test]
    fn test_prepare_rows_keeps_first_duplicate() {
        let records = vec![
            rawg_record("Hades", 4.5),
            json!({"name": ""}),
            rawg_record("Celeste", 4.3),
            rawg_record("Hades", 1.0),
        ];

        let rows = prepare_rows(&records);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["Hades", "Celeste"]);
        assert!((rows[0].rating - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_rows_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("games_clean.json");
        let rows = prepare_rows(&[rawg_record("Hades", 4.5)]);

        write_rows(&path, &rows).unwrap();
        assert_eq!(read_rows(&path).unwrap(), rows);
    }

    #[test]
    fn test_read_raw_records_requires_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allGames.json");
        std::fs::write(&path, r#"{"name": "not a list"}"#).unwrap();

        assert!(matches!(
            read_raw_records(&path),
            Err(AppError::BadRequest(_))
        ));
    }
}
