// File: src/storage.rs
// Persisted registry + settings, versioned JSON on disk
use crate::config::{Configuration, DEFAULT_PALETTE_SIZE};
use crate::registry::TagRegistry;
use anyhow::Result;
use directories::ProjectDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const CURRENT_VERSION: u32 = 2;

/// Overrides the data directory (tests, portable installs).
pub const DATA_DIR_ENV: &str = "TAGHUE_DATA_DIR";

const STATE_FILE: &str = "state.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub version: u32,
    #[serde(default)]
    pub settings: Configuration,
    #[serde(default)]
    pub known_tags: TagRegistry,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            settings: Configuration::default(),
            known_tags: TagRegistry::default(),
        }
    }
}

impl PersistedState {
    /// Migrates raw JSON up to [`CURRENT_VERSION`] and decodes it.
    ///
    /// Returns `None` for anything that is not a state object; the caller then
    /// starts from defaults. The flag reports whether a migration ran.
    pub fn from_raw(raw: Value) -> Option<(Self, bool)> {
        if !raw.is_object() {
            tracing::warn!("persisted state is not an object, starting fresh");
            return None;
        }
        let (raw, migrated) = migrate(raw);
        match serde_json::from_value::<PersistedState>(raw) {
            Ok(mut state) => {
                state.settings = state.settings.sanitized();
                Some((state, migrated))
            }
            Err(e) => {
                tracing::warn!(error = %e, "persisted state is unreadable, starting fresh");
                None
            }
        }
    }
}

/// One schema upgrade, applied to a state object at version `from`.
type Migration = fn(&mut serde_json::Map<String, Value>);

const MIGRATIONS: &[(u32, Migration)] = &[(1, add_palette_size)];

/// Runs every migration step from the stored version upwards. A missing
/// version field means version 1; a version too large for `u32` matches no
/// step and is left alone.
pub fn migrate(mut raw: Value) -> (Value, bool) {
    let mut migrated = false;
    if let Some(object) = raw.as_object_mut() {
        let mut version = match object.get("version").and_then(Value::as_u64) {
            Some(v) => u32::try_from(v).unwrap_or(u32::MAX),
            None => 1,
        };

        for (from, step) in MIGRATIONS {
            if version == *from {
                step(object);
                version = from + 1;
                object.insert("version".to_string(), json!(version));
                migrated = true;
                tracing::debug!(from, to = version, "migrated persisted state");
            }
        }
    }
    (raw, migrated)
}

// v1 -> v2: palette size became configurable
fn add_palette_size(state: &mut serde_json::Map<String, Value>) {
    let settings = state
        .entry("settings")
        .or_insert_with(|| Value::Object(Default::default()));
    if let Value::Object(settings) = settings {
        settings
            .entry("palette")
            .or_insert(json!(DEFAULT_PALETTE_SIZE));
    }
}

/// Where the engine reads and writes its state.
pub trait StateStore {
    /// Raw, unmigrated state, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<Value>>;
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// JSON file in the per-user data directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `state.json` under `$TAGHUE_DATA_DIR`, else under the platform data
    /// directory. The directory is created on demand; a failure there surfaces
    /// later as a save error.
    pub fn default_location() -> Option<Self> {
        let dir = env::var_os(DATA_DIR_ENV).map(PathBuf::from).or_else(|| {
            ProjectDirs::from("com", "taghue", "taghue").map(|p| p.data_dir().to_path_buf())
        })?;
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(error = %e, dir = %dir.display(), "cannot create data directory");
        }
        Some(Self::at(dir.join(STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Runs `f` while holding an exclusive advisory lock on a sidecar file.
    pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.with_extension("lock"))?;
        FileExt::lock_exclusive(&lock_file)?;
        let result = f();
        FileExt::unlock(&lock_file)?;
        result
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = Self::with_lock(&self.path, || Ok(fs::read_to_string(&self.path)?))?;
        // Corrupt file: keep running on defaults, the next save replaces it
        match serde_json::from_str(&content) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt state file");
                Ok(None)
            }
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        Self::with_lock(&self.path, || {
            let json = serde_json::to_string_pretty(state)?;
            Self::atomic_write(&self.path, json)?;
            Ok(())
        })
    }
}

/// In-memory store that counts writes. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<Value>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: Value) -> Self {
        Self {
            raw: RefCell::new(Some(raw)),
            writes: Cell::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn saved(&self) -> Option<PersistedState> {
        let raw = self.raw.borrow().clone()?;
        serde_json::from_value(raw).ok()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.raw.borrow().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self.raw.borrow_mut() = Some(serde_json::to_value(state)?);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
