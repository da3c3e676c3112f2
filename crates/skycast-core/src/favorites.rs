// ── Favorites persistence ──
//
// The favorite subset of the city collection is stored as one JSON blob.
// `FavoritesBackend` is the storage seam: a file on disk for the real
// application, an in-memory slot for `--no-persist` and tests.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::FavoritesError;
use crate::model::City;

/// File name of the snapshot inside the data directory.
pub const FAVORITES_FILE_NAME: &str = "favorite_cities.json";

/// Durable storage for a single opaque blob.
pub trait FavoritesBackend: Send + Sync {
    /// Read the blob. `Ok(None)` when nothing has been written yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the blob.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;
}

// ── File backend ─────────────────────────────────────────────────────

/// Stores the blob in a file, replaced atomically on each write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FavoritesBackend for FileBackend {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)
    }
}

// ── Memory backend ───────────────────────────────────────────────────

/// Process-local slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded slot, e.g. with a hand-written snapshot.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Current blob, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FavoritesBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes.to_vec());
        Ok(())
    }
}

// ── Store ────────────────────────────────────────────────────────────

/// Reads and writes the persisted favorites snapshot.
pub struct FavoritesStore {
    backend: Box<dyn FavoritesBackend>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").finish_non_exhaustive()
    }
}

impl FavoritesStore {
    pub fn new(backend: impl FavoritesBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Snapshot kept in memory only; nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Snapshot stored at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }

    /// Overwrite the snapshot with the favorites among `cities`, in order.
    pub fn save(&self, cities: &[City]) -> Result<(), FavoritesError> {
        let favorites: Vec<&City> = cities.iter().filter(|c| c.is_favorite).collect();
        let bytes = serde_json::to_vec_pretty(&favorites)?;
        self.backend.write(&bytes)?;
        debug!(count = favorites.len(), "favorites snapshot written");
        Ok(())
    }

    /// Read the snapshot. Missing, unreadable or corrupt data yields an empty list.
    pub fn load(&self) -> Vec<City> {
        let bytes = match self.backend.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read favorites snapshot, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<City>>(&bytes) {
            Ok(cities) => {
                debug!(count = cities.len(), "favorites snapshot loaded");
                cities
            }
            Err(e) => {
                warn!(error = %e, "favorites snapshot is corrupt, ignoring it");
                Vec::new()
            }
        }
    }
}
