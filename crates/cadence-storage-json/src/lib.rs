//! cadence-storage-json
//!
//! Filesystem JSON source for recurring rules and calendar items.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use cadence_core::{CalendarSource, RuleSource, SourceError};
use cadence_domain::{CalendarItem, DateWindow, RecurrenceRule};

pub const RULES_FILE: &str = "rules.json";
pub const ITEMS_FILE: &str = "calendar_items.json";
const TMP_SUFFIX: &str = "tmp";

/// A data directory holding `rules.json` and `calendar_items.json`.
///
/// Missing files read as empty collections.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: PathBuf) -> Result<Self, SourceError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules_path(&self) -> PathBuf {
        self.root.join(RULES_FILE)
    }

    pub fn items_path(&self) -> PathBuf {
        self.root.join(ITEMS_FILE)
    }

    pub fn load_rules(&self) -> Result<Vec<RecurrenceRule>, SourceError> {
        read_collection(&self.rules_path())
    }

    pub fn save_rules(&self, rules: &[RecurrenceRule]) -> Result<(), SourceError> {
        write_collection(&self.rules_path(), rules)
    }

    pub fn load_items(&self) -> Result<Vec<CalendarItem>, SourceError> {
        read_collection(&self.items_path())
    }

    pub fn save_items(&self, items: &[CalendarItem]) -> Result<(), SourceError> {
        write_collection(&self.items_path(), items)
    }
}

impl RuleSource for JsonStore {
    fn list_recurring_rules(&self) -> Result<Vec<RecurrenceRule>, SourceError> {
        self.load_rules()
    }
}

impl CalendarSource for JsonStore {
    fn list_calendar_items(&self, window: DateWindow) -> Result<Vec<CalendarItem>, SourceError> {
        let mut items = self.load_items()?;
        items.retain(|item| item.starts_within(&window));
        Ok(items)
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no data file, treating as empty");
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<T> = serde_json::from_str(&data)?;
    tracing::debug!(path = %path.display(), count = values.len(), "loaded collection");
    Ok(values)
}

fn write_collection<T: Serialize>(path: &Path, values: &[T]) -> Result<(), SourceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(values)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
