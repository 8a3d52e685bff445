//! JSONL-based storage implementation with in-memory caching.
//!
//! Each collection lives in `<base>/<collection>.jsonl`. A batch is applied
//! to copies of the affected collections first. Every copy is then written
//! to a temp file, and a commit marker listing them is written last. Only
//! then are the temp files renamed into place. A marker left by an
//! interrupted batch is completed when storage is next opened or written,
//! and temp files without a marker are ignored.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::de::DeserializeOwned;

use super::traits::{Filter, Storage, WriteOp};
use crate::error::{Result, StackError};

/// Names the collections of a batch whose temp files are complete
const COMMIT_MARKER: &str = "batch.commit";

/// JSONL-based storage with in-memory caching.
pub struct JsonlStorage {
    base_path: PathBuf,
    cache: RwLock<HashMap<String, Vec<serde_json::Value>>>,
}

impl JsonlStorage {
    /// Open storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        let storage = Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
        };
        storage.recover()?;
        Ok(storage)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", collection))
    }

    fn read_collection(&self, collection: &str) -> Result<Vec<serde_json::Value>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                records.push(serde_json::from_str(&line)?);
            }
        }
        Ok(records)
    }

    /// Load a collection into cache if not already loaded.
    fn ensure_loaded(&self, collection: &str) -> Result<()> {
        {
            let cache = self.cache.read().map_err(|e| StackError::Storage(e.to_string()))?;
            if cache.contains_key(collection) {
                return Ok(());
            }
        }

        let mut cache = self.cache.write().map_err(|e| StackError::Storage(e.to_string()))?;
        if !cache.contains_key(collection) {
            let records = self.read_collection(collection)?;
            tracing::debug!(collection, records = records.len(), "Loaded collection");
            cache.insert(collection.to_string(), records);
        }
        Ok(())
    }

    fn temp_path(&self, collection: &str) -> PathBuf {
        self.base_path.join(format!(".{}.jsonl.tmp", collection))
    }

    fn marker_path(&self) -> PathBuf {
        self.base_path.join(COMMIT_MARKER)
    }

    fn write_lines<'a>(path: &Path, lines: impl IntoIterator<Item = &'a serde_json::Value>) -> Result<()> {
        let mut file = File::create(path)?;
        for line in lines {
            writeln!(file, "{}", serde_json::to_string(line)?)?;
        }
        file.sync_all()?;
        Ok(())
    }

    /// Write every staged collection to its temp file, then the commit marker.
    fn prepare(&self, staged: &HashMap<&str, Vec<serde_json::Value>>) -> Result<()> {
        for (collection, records) in staged {
            Self::write_lines(&self.temp_path(collection), records)?;
        }

        let names: Vec<&str> = staged.keys().copied().collect();
        let marker = serde_json::to_value(&names)?;
        let tmp = self.base_path.join(format!(".{}.tmp", COMMIT_MARKER));
        Self::write_lines(&tmp, [&marker])?;
        fs::rename(&tmp, self.marker_path())?;
        Ok(())
    }

    fn discard_temps(&self, collections: &[&str]) {
        for collection in collections {
            let _ = fs::remove_file(self.temp_path(collection));
        }
    }

    /// Rename the temp files named by the marker into place and drop the marker.
    fn complete(&self, collections: &[String]) -> Result<()> {
        for collection in collections {
            let tmp = self.temp_path(collection);
            if tmp.exists() {
                fs::rename(&tmp, self.collection_path(collection))?;
            }
        }
        fs::remove_file(self.marker_path())?;
        Ok(())
    }

    /// Finish a batch whose commit marker was written but not cleared.
    fn recover(&self) -> Result<()> {
        let marker = self.marker_path();
        if !marker.exists() {
            return Ok(());
        }

        let collections: Vec<String> = serde_json::from_str(&fs::read_to_string(&marker)?)?;
        self.complete(&collections)?;

        let mut cache = self.cache.write().map_err(|e| StackError::Storage(e.to_string()))?;
        for collection in &collections {
            cache.remove(collection.as_str());
        }
        tracing::warn!(collections = ?collections, "Completed interrupted write batch");
        Ok(())
    }
}

impl Storage for JsonlStorage {
    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        self.ensure_loaded(collection)?;

        let cache = self.cache.read().map_err(|e| StackError::Storage(e.to_string()))?;
        let record = cache
            .get(collection)
            .and_then(|records| records.iter().find(|r| r.get("id").and_then(|v| v.as_str()) == Some(id)));

        match record {
            Some(record) => Ok(Some(serde_json::from_value(record.clone())?)),
            None => Ok(None),
        }
    }

    fn query<T: DeserializeOwned>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>> {
        self.ensure_loaded(collection)?;

        let cache = self.cache.read().map_err(|e| StackError::Storage(e.to_string()))?;
        let records = cache
            .get(collection)
            .ok_or_else(|| StackError::Storage(format!("Collection not loaded: {}", collection)))?;

        records
            .iter()
            .filter(|record| filters.iter().all(|f| f.matches(record)))
            .map(|record| serde_json::from_value(record.clone()).map_err(StackError::from))
            .collect()
    }

    fn apply(&self, ops: &[WriteOp]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }
        self.recover()?;

        let mut collections: Vec<&str> = ops.iter().map(WriteOp::collection).collect();
        collections.sort_unstable();
        collections.dedup();
        for collection in &collections {
            self.ensure_loaded(collection)?;
        }

        let mut cache = self.cache.write().map_err(|e| StackError::Storage(e.to_string()))?;

        let mut staged: HashMap<&str, Vec<serde_json::Value>> = HashMap::new();
        for collection in &collections {
            let records = cache
                .get(*collection)
                .ok_or_else(|| StackError::Storage(format!("Collection not loaded: {}", collection)))?;
            staged.insert(*collection, records.clone());
        }

        for op in ops {
            let records = staged
                .get_mut(op.collection())
                .ok_or_else(|| StackError::Storage(format!("Collection not staged: {}", op.collection())))?;
            op.apply_to(records)?;
        }

        if let Err(e) = self.prepare(&staged) {
            self.discard_temps(&collections);
            return Err(e);
        }

        // Committed: the batch survives a failure from here on via `recover`
        let names: Vec<String> = collections.iter().map(|c| c.to_string()).collect();
        for (collection, records) in staged {
            cache.insert(collection.to_string(), records);
        }
        self.complete(&names)?;

        tracing::debug!(ops = ops.len(), collections = collections.len(), "Applied write batch");
        Ok(())
    }
}
