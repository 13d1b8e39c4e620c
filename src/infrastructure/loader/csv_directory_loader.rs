//! Loads per-entity price history from a directory of CSV files.
//!
//! Layout: `<root>/<category>/<entity>.csv`. Each file needs `Date`, `Open`
//! and `Close` columns; any other columns are ignored.

use crate::domain::market::{EntitySeries, EntityUniverse, PriceRecord};
use crate::domain::ports::PriceSeriesLoader;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Decimal,
    #[serde(rename = "Close")]
    close: Decimal,
}

/// Accepts `YYYY-MM-DD` optionally followed by a time component.
fn parse_trading_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").context(format!("Invalid date: {}", raw))
}

/// Sorted paths of the entries in `dir` accepted by `keep`.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .context(format!("Failed to read directory {:?}", dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .context(format!("Failed to list directory {:?}", dir))?;
    paths.retain(|p| keep(p));
    paths.sort();
    Ok(paths)
}

pub struct CsvDirectoryLoader {
    root: PathBuf,
}

impl CsvDirectoryLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads one CSV file into a series named after the file stem (up to the first `.`).
    pub fn load_file(path: &Path) -> Result<EntitySeries> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .filter(|n| !n.is_empty())
            .context(format!("Cannot derive entity name from {:?}", path))?
            .to_string();

        let mut reader =
            csv::Reader::from_path(path).context(format!("Failed to open {:?}", path))?;

        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<PriceRow>().enumerate() {
            let row = row.context(format!("Malformed row {} in {:?}", line + 1, path))?;
            let date = parse_trading_date(&row.date)
                .context(format!("Malformed row {} in {:?}", line + 1, path))?;
            records.push(PriceRecord::new(date, row.open, row.close));
        }

        debug!("Loaded {} records for {} from {:?}", records.len(), name, path);
        Ok(EntitySeries::new(name, records))
    }
}

impl PriceSeriesLoader for CsvDirectoryLoader {
    fn load_entities(&self) -> Result<EntityUniverse> {
        let categories = sorted_entries(&self.root, Path::is_dir)?;
        let mut universe = EntityUniverse::new();

        for category_path in categories {
            let category = category_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let files = sorted_entries(&category_path, |p| {
                p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("csv")
            })?;

            for file in files {
                let series = Self::load_file(&file)?.with_category(category.clone());
                if let Some(previous) = universe.insert(series.name.clone(), series) {
                    warn!(
                        "Entity {} from category {:?} replaced by {:?}",
                        previous.name,
                        previous.category.unwrap_or_default(),
                        file
                    );
                }
            }
        }

        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_test_root() -> PathBuf {
        let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "rustcorr_test_{}_{}_{}_loader",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            unique_id
        ));
        fs::create_dir_all(&temp_dir).expect("Failed to create test temp dir");
        temp_dir
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_loads_categories_and_sorts_dates() {
        let root = create_test_root();
        write(
            &root,
            "tech/AAPL.csv",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-03,101.0,103,100,102.5,1000\n\
             2024-01-02,100.0,101,99,101.0,1200\n",
        );
        write(&root, "energy/XOM.csv", "Date,Open,Close\n2024-01-02,50,49.5\n");
        write(&root, "energy/notes.txt", "not a price file");
        write(&root, "README.csv", "Date,Open,Close\n");

        let universe = CsvDirectoryLoader::new(&root).load_entities().unwrap();

        assert_eq!(universe.keys().collect::<Vec<_>>(), vec!["AAPL", "XOM"]);

        let aapl = &universe["AAPL"];
        assert_eq!(aapl.category.as_deref(), Some("tech"));
        assert_eq!(aapl.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(aapl.records[0].open, dec!(100.0));
        assert_eq!(aapl.records[1].close, dec!(102.5));

        assert_eq!(universe["XOM"].category.as_deref(), Some("energy"));

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_entity_name_stops_at_first_dot() {
        let root = create_test_root();
        write(&root, "idx/BRK.B.csv", "Date,Open,Close\n2024-01-02 00:00:00-05:00,10,11\n");

        let series = CsvDirectoryLoader::load_file(&root.join("idx/BRK.B.csv")).unwrap();
        assert_eq!(series.name, "BRK");
        assert_eq!(series.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_later_category_replaces_duplicate() {
        let root = create_test_root();
        write(&root, "a_first/DUP.csv", "Date,Open,Close\n2024-01-02,1,2\n");
        write(&root, "b_second/DUP.csv", "Date,Open,Close\n2024-01-02,3,4\n");

        let universe = CsvDirectoryLoader::new(&root).load_entities().unwrap();
        assert_eq!(universe.len(), 1);
        assert_eq!(universe["DUP"].category.as_deref(), Some("b_second"));

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_malformed_rows_are_errors() {
        let root = create_test_root();
        write(&root, "x/BAD.csv", "Date,Open,Close\nyesterday,1,2\n");
        write(&root, "x/WORSE.csv", "Date,Open\n2024-01-02,1\n");

        let bad = CsvDirectoryLoader::load_file(&root.join("x/BAD.csv")).unwrap_err();
        assert!(format!("{:#}", bad).contains("yesterday"));
        assert!(CsvDirectoryLoader::load_file(&root.join("x/WORSE.csv")).is_err());

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_missing_root_is_error() {
        let loader = CsvDirectoryLoader::new("/definitely/not/here/rustcorr");
        assert!(loader.load_entities().is_err());
    }
}
