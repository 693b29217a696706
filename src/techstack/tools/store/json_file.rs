use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use uuid::Uuid;

use super::{MemoryStore, Store, StoreResult};
use crate::techstack::tools::error::PersistenceError;
use crate::techstack::tools::model::{Roadmap, TechStack};

/// Store persisted as a single JSON document, rewritten after every write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> StoreResult<Self> {
        let inner = if path.exists() {
            let source = fs::read_to_string(path).map_err(unavailable)?;
            if source.trim().is_empty() {
                MemoryStore::new()
            } else {
                serde_json::from_str(&source).map_err(unavailable)?
            }
        } else {
            MemoryStore::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    fn flush(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }
        let json = serde_json::to_string_pretty(&self.inner).map_err(unavailable)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(unavailable)?;
        fs::rename(&staging, &self.path).map_err(unavailable)?;
        debug!(path = %self.path.display(), "store flushed");
        Ok(())
    }

    /// Applies a write to the in-memory copy and persists it; the in-memory
    /// copy is left untouched when the write is rejected.
    fn write<T>(&mut self, apply: impl FnOnce(&mut MemoryStore) -> StoreResult<T>) -> StoreResult<T> {
        let mut next = self.inner.clone();
        let value = apply(&mut next)?;
        let previous = std::mem::replace(&mut self.inner, next);
        if let Err(error) = self.flush() {
            self.inner = previous;
            return Err(error);
        }
        Ok(value)
    }
}

fn unavailable(error: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Unavailable(error.to_string())
}

impl Store for JsonFileStore {
    fn find_tech_stack(&self, name: &str) -> StoreResult<Option<TechStack>> {
        self.inner.find_tech_stack(name)
    }

    fn get_tech_stack(&self, id: Uuid) -> StoreResult<Option<TechStack>> {
        self.inner.get_tech_stack(id)
    }

    fn list_tech_stacks(&self) -> StoreResult<Vec<TechStack>> {
        self.inner.list_tech_stacks()
    }

    fn insert_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack> {
        self.write(|store| store.insert_tech_stack(stack))
    }

    fn replace_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack> {
        self.write(|store| store.replace_tech_stack(stack))
    }

    fn delete_tech_stack(&mut self, id: Uuid) -> StoreResult<()> {
        self.write(|store| store.delete_tech_stack(id))
    }

    fn get_roadmap(&self, id: Uuid) -> StoreResult<Option<Roadmap>> {
        self.inner.get_roadmap(id)
    }

    fn list_roadmaps(&self) -> StoreResult<Vec<Roadmap>> {
        self.inner.list_roadmaps()
    }

    fn insert_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap> {
        self.write(|store| store.insert_roadmap(roadmap))
    }

    fn replace_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap> {
        self.write(|store| store.replace_roadmap(roadmap))
    }

    fn delete_roadmap(&mut self, id: Uuid) -> StoreResult<()> {
        self.write(|store| store.delete_roadmap(id))
    }
}
