//! The attribute store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::config;
use crate::error::{Result, StoreError};

/// The full persisted state: attribute name to JSON value.
///
/// Backed by a `BTreeMap` so keys always iterate in lexicographic order.
pub type Document = BTreeMap<String, Value>;

/// Manages the attribute document and its backing file.
///
/// The whole document is held in memory. Every mutation rewrites the
/// backing file in one piece:
/// ```text
/// ~/.eky.json
/// {"foo":"bar","n":42}
/// ```
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    document: Document,
}

impl Store {
    /// Creates a store with an empty document bound to `path`.
    ///
    /// Nothing is read until [`Store::load`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: Document::new(),
        }
    }

    /// Creates a store bound to `path` and loads it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Opens the store at `~/.eky.json`.
    pub fn open_default() -> Result<Self> {
        Self::open(config::store_file()?)
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.document.contains_key(key)
    }

    /// Replaces the in-memory document with the contents of the backing file.
    ///
    /// A missing or blank file yields an empty document. On error the
    /// current document is left untouched.
    ///
    /// # Errors
    /// Returns [`StoreError::Read`] if the file cannot be read,
    /// [`StoreError::Decode`] if it is not valid JSON and
    /// [`StoreError::NotAnObject`] if the top level is not an object.
    pub fn load(&mut self) -> Result<()> {
        let document = match read_json_optional(&self.path)? {
            None => Document::new(),
            Some(Value::Object(map)) => map.into_iter().collect(),
            Some(other) => {
                return Err(StoreError::NotAnObject {
                    path: self.path.clone(),
                    found: kind_of(&other),
                })
            }
        };

        debug!(path = %self.path.display(), keys = document.len(), "Loaded store");
        self.document = document;
        Ok(())
    }

    /// Overwrites the backing file with the current document.
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if serialization fails, or a write or
    /// directory error if the file cannot be replaced.
    pub fn save(&self) -> Result<()> {
        atomic_write_json(&self.path, &self.document)?;
        debug!(path = %self.path.display(), keys = self.document.len(), "Saved store");
        Ok(())
    }

    /// Lists all keys in lexicographic order.
    pub fn list(&self) -> Vec<&str> {
        self.document.keys().map(String::as_str).collect()
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Stores `raw` under `key` and persists the document.
    ///
    /// `raw` is parsed as JSON; if that fails it is stored verbatim as a
    /// string. See [`parse_value`].
    ///
    /// # Errors
    /// Returns [`StoreError::Persist`] if the document cannot be saved. The
    /// in-memory document keeps the new value either way.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        let value = parse_value(raw);
        info!(key = %key, kind = kind_of(&value), "Setting attribute");
        self.document.insert(key.to_string(), value);

        self.save().map_err(|source| StoreError::Persist {
            key: key.to_string(),
            source: Box::new(source),
        })
    }

    /// Removes every listed key that is present, then persists once.
    ///
    /// Absent keys are skipped. Returns how many keys were removed.
    pub fn remove<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<usize> {
        let mut removed = 0;
        for key in keys {
            let key: &str = key.as_ref();
            if self.document.remove(key).is_some() {
                removed += 1;
            }
        }
        info!(requested = keys.len(), removed, "Removing attributes");

        self.save()?;
        Ok(removed)
    }

    /// Drops every attribute and persists the empty document.
    pub fn clear(&mut self) -> Result<()> {
        info!(keys = self.document.len(), "Clearing store");
        self.document.clear();
        self.save()
    }
}

/// Parses user input as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Renders a value as pretty-printed JSON with two-space indentation.
pub fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn test_store(dir: &Path) -> Store {
        Store::new(dir.join(".eky.json"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join(".eky.json")).unwrap();

        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_load_rejects_non_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".eky.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = Store::open(&path);
        assert!(matches!(
            result,
            Err(StoreError::NotAnObject { found: "array", .. })
        ));
    }

    #[test]
    fn test_load_malformed_keeps_document() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());
        store.set("keep", "1").unwrap();

        fs::write(store.path(), "{oops").unwrap();
        let result = store.load();

        assert!(matches!(result, Err(StoreError::Decode { .. })));
        assert_eq!(store.get("keep"), Some(&json!(1)));
    }

    #[test]
    fn test_load_unreadable_path() {
        let dir = tempdir().unwrap();
        // A directory exists but cannot be read as a file
        let result = Store::open(dir.path());

        assert!(matches!(result, Err(StoreError::Read { .. })));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());
        store.set("s", "\"text\"").unwrap();
        store.set("n", "3.5").unwrap();
        store.set("b", "true").unwrap();
        store.set("z", "null").unwrap();
        store.set("a", "[1, \"two\", {\"three\": 3}]").unwrap();
        store.set("o", "{\"nested\": {\"deep\": []}}").unwrap();

        let loaded = Store::open(store.path()).unwrap();
        assert_eq!(loaded.document(), store.document());
    }

    #[test]
    fn test_set_parses_json() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());

        store.set("n", "42").unwrap();
        store.set("obj", "{\"a\": [1, 2]}").unwrap();

        assert_eq!(store.get("n"), Some(&json!(42)));
        assert_eq!(store.get("obj"), Some(&json!({"a": [1, 2]})));
    }

    #[test]
    fn test_set_falls_back_to_string() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());

        store.set("greeting", "hello world").unwrap();

        assert_eq!(store.get("greeting"), Some(&json!("hello world")));
        assert_eq!(render(store.get("greeting").unwrap()), "\"hello world\"");
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());

        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k"), Some(&json!(2)));
    }

    #[test]
    fn test_set_persist_failure() {
        let dir = tempdir().unwrap();
        // Renaming a file over a directory fails
        let mut store = Store::new(dir.path());

        let result = store.set("k", "v");

        assert!(matches!(result, Err(StoreError::Persist { ref key, .. }) if key == "k"));
        assert!(store.contains("k"));
    }

    #[test]
    fn test_remove_present_and_absent() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let removed = store.remove(&["a", "missing"]).unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("a").is_none());
        assert_eq!(store.list(), vec!["b"]);

        let loaded = Store::open(store.path()).unwrap();
        assert_eq!(loaded.list(), vec!["b"]);
    }

    #[test]
    fn test_remove_persist_failure_propagates() {
        let dir = tempdir().unwrap();
        let mut store = Store::new(dir.path());

        let result = store.remove(&["a"]);
        assert!(matches!(result, Err(StoreError::Write { .. })));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.clear().unwrap();
        let once = fs::read_to_string(store.path()).unwrap();
        store.clear().unwrap();
        let twice = fs::read_to_string(store.path()).unwrap();

        assert!(store.list().is_empty());
        assert_eq!(once, "{}\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_list_is_sorted() {
        let dir = tempdir().unwrap();
        let mut store = test_store(dir.path());
        store.set("zeta", "1").unwrap();
        store.set("alpha", "2").unwrap();
        store.set("Mid", "3").unwrap();

        assert_eq!(store.list(), vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_render_pretty() {
        let value = json!({"a": [1, 2]});
        assert_eq!(render(&value), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
        assert_eq!(render(&json!(42)), "42");
        assert_eq!(render(&json!(null)), "null");
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_value("bar"), json!("bar"));
        assert_eq!(parse_value(""), json!(""));
    }
}
