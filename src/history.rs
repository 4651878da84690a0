use chrono::Utc;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::config::HistoryConfig;
use crate::error::DishError;
use crate::extractors::{recipe_id, stable_hash};
use crate::model::{HistoryEntry, RecipeInput};

pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Bounded list of cooked recipes, most recently cooked first.
///
/// The list lives in a single JSON document that is re-read at the start of
/// every operation and replaced as a whole on every write. Operations on one
/// store are serialized by an internal lock, so share a single instance
/// (e.g. behind an `Arc`) between concurrent callers.
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(&config.path).with_max_entries(config.max_entries)
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, most recently cooked first. A missing document reads as empty.
    pub async fn read(&self) -> Result<Vec<HistoryEntry>, DishError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Record a cook of `input` and return the stored entry.
    ///
    /// An entry with the same URL (or, for entries without a URL, the same
    /// name and source) is updated and moved to the front; otherwise a new
    /// entry is inserted at the front. Entries beyond the limit are dropped.
    pub async fn add(&self, mut input: RecipeInput) -> Result<HistoryEntry, DishError> {
        if input.name.trim().is_empty() {
            return Err(DishError::Validation("Recipe name is required".to_string()));
        }
        if input.url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            input.url = None;
        }

        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let now = Utc::now();

        let entry = match find_same_recipe(&entries, &input) {
            Some(index) => {
                let mut entry = entries.remove(index);
                entry.record_cook(input, now);
                debug!("Cooked '{}' again ({} times)", entry.name, entry.cook_count);
                entry
            }
            None => {
                let id = entry_id(&input);
                debug!("First cook of '{}'", input.name);
                HistoryEntry::first_cook(id, input, now)
            }
        };

        entries.insert(0, entry.clone());
        entries.truncate(self.max_entries);
        self.persist(&entries).await?;

        Ok(entry)
    }

    /// Remove the whole history. Clearing a missing history is not an error.
    pub async fn clear(&self) -> Result<(), DishError> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Cleared history at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>, DishError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write to a sibling temp file, then rename it over the document so a
    /// failed write never leaves a half-written history behind.
    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), DishError> {
        let json = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = fs::write(&tmp_path, &json).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        fs::rename(&tmp_path, &self.path).await?;

        debug!(
            "Saved {} history entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn find_same_recipe(entries: &[HistoryEntry], input: &RecipeInput) -> Option<usize> {
    match input.url.as_deref() {
        Some(url) => entries
            .iter()
            .position(|entry| entry.url.as_deref() == Some(url)),
        None => entries.iter().position(|entry| {
            entry.url.is_none() && entry.name == input.name && entry.source == input.source
        }),
    }
}

fn entry_id(input: &RecipeInput) -> String {
    if let Some(id) = input.id.as_deref().filter(|id| !id.trim().is_empty()) {
        return id.to_string();
    }
    match input.url.as_deref() {
        Some(url) => recipe_id(url),
        None => stable_hash(&format!(
            "{}|{}",
            input.name,
            input.source.as_deref().unwrap_or_default()
        )),
    }
}
