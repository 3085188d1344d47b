use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::FileError;
use crate::store::Preferences;

/// Layout of a preference CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvFormat {
    /// One row per person: `Person,Pref1,Pref2,...`.
    #[default]
    Wide,
    /// One row per (person, item) pair, ranked by row order.
    Long,
}

impl CsvFormat {
    pub fn name(self) -> &'static str {
        match self {
            CsvFormat::Wide => "wide",
            CsvFormat::Long => "long",
        }
    }
}

impl fmt::Display for CsvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CsvFormat {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wide" => Ok(CsvFormat::Wide),
            "long" => Ok(CsvFormat::Long),
            _ => Err(FileError::UnsupportedFormat(s.to_string())),
        }
    }
}

fn open(path: &Path) -> Result<File, FileError> {
    File::open(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Trimmed cell, or `None` when blank.
fn cell(record: &StringRecord, index: usize) -> Option<&str> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Every item named anywhere in `preferences`, in first-appearance order.
pub fn collect_items(preferences: &Preferences) -> Vec<String> {
    let items: IndexSet<&String> = preferences.values().flatten().collect();
    items.into_iter().cloned().collect()
}

/// Loads ranked preferences from a CSV file.
///
/// Returns the preferences in file order together with every distinct item
/// they mention. A file that yields no person with at least one preference
/// is an error.
pub fn load_preferences<P: AsRef<Path>>(
    path: P,
    format: CsvFormat,
    delimiter: u8,
) -> Result<(Preferences, Vec<String>), FileError> {
    let path = path.as_ref();
    let preferences = read_preferences(open(path)?, format, delimiter)?;
    if preferences.is_empty() {
        return Err(FileError::Empty(path.to_path_buf()));
    }

    let items = collect_items(&preferences);
    info!(
        path = %path.display(),
        format = %format,
        people = preferences.len(),
        items = items.len(),
        "preferences loaded"
    );
    Ok((preferences, items))
}

/// Parses preferences from any reader. The first row is always a header.
///
/// People without a single non-blank preference are dropped, and repeated
/// items within one person's list keep their first position only.
pub fn read_preferences<R: Read>(
    reader: R,
    format: CsvFormat,
    delimiter: u8,
) -> Result<Preferences, FileError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns = reader.headers()?.len();
    let mut preferences = Preferences::new();

    match format {
        CsvFormat::Wide => {
            for result in reader.records() {
                let record = result?;
                let Some(person) = cell(&record, 0) else {
                    continue;
                };
                let mut list: IndexSet<String> = IndexSet::new();
                for index in 1..record.len() {
                    if let Some(item) = cell(&record, index) {
                        list.insert(item.to_string());
                    }
                }
                if list.is_empty() {
                    debug!(person, "row without preferences skipped");
                    continue;
                }
                // A later row for the same person replaces the earlier one.
                preferences.insert(person.to_string(), list.into_iter().collect());
            }
        }
        CsvFormat::Long => {
            if columns < 2 {
                return Err(FileError::MissingColumns {
                    format: "long",
                    required: 2,
                    found: columns,
                });
            }
            for result in reader.records() {
                let record = result?;
                let (Some(person), Some(item)) = (cell(&record, 0), cell(&record, 1)) else {
                    continue;
                };
                let list = preferences.entry(person.to_string()).or_default();
                if !list.iter().any(|existing| existing == item) {
                    list.push(item.to_string());
                }
            }
        }
    }

    Ok(preferences)
}

/// Loads the full item catalog from a one-column CSV with a header row.
///
/// Blank cells and repeats are skipped.
pub fn load_item_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<String>, FileError> {
    let path = path.as_ref();
    let items = read_item_catalog(open(path)?)?;
    info!(path = %path.display(), items = items.len(), "item catalog loaded");
    Ok(items)
}

pub fn read_item_catalog<R: Read>(reader: R) -> Result<Vec<String>, FileError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut items: IndexSet<String> = IndexSet::new();
    for result in reader.records() {
        let record = result?;
        if let Some(item) = cell(&record, 0) {
            items.insert(item.to_string());
        }
    }
    Ok(items.into_iter().collect())
}
