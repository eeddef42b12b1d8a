//! Key-value persistence for cross-session stats.
//!
//! Stats are stored as JSON values under fixed keys. Loading is forgiving: a missing key, a
//! failing backend or a malformed value all fall back to defaults so a damaged store never
//! prevents a table from opening.

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Opaque get/set storage for JSON values.
pub trait StatsStore {
    fn load(&self, key: &str) -> Result<Option<Value>>;
    fn save(&mut self, key: &str, value: Value) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Load `T` stored under `key`, or `T::default()` if it is absent or unreadable.
pub fn load_stats<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: StatsStore + ?Sized,
{
    let value = match store.load(key) {
        Ok(Some(value)) => value,
        Ok(None) => return T::default(),
        Err(err) => {
            warn!(key, error = ?err, "failed to load stats; using defaults");
            return T::default();
        }
    };
    match serde_json::from_value(value) {
        Ok(stats) => stats,
        Err(err) => {
            warn!(key, error = %err, "malformed stats; using defaults");
            T::default()
        }
    }
}

pub fn save_stats<T, S>(store: &mut S, key: &str, stats: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: StatsStore + ?Sized,
{
    let value = serde_json::to_value(stats).context("failed to serialize stats")?;
    store.save(key, value)
}

/// In-process store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StatsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store holding one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create stats directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("invalid stats key {key:?}");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StatsStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("could not read {}", path.display()))
            }
        };
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("could not parse {}", path.display()))?;
        Ok(Some(value))
    }

    fn save(&mut self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key)?;
        let contents = serde_json::to_string_pretty(&value).context("failed to encode stats")?;
        fs::write(&path, contents).with_context(|| format!("could not write {}", path.display()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("could not remove {}", path.display())),
        }
    }
}
