//! Document store contract for tech stacks and roadmaps.
//!
//! Callers receive the store handle explicitly; nothing in the crate keeps a
//! process-wide connection. [`MemoryStore`] backs tests, [`JsonFileStore`]
//! backs the command-line tool.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use uuid::Uuid;

use crate::techstack::tools::error::PersistenceError;
use crate::techstack::tools::model::{Roadmap, TechStack};

/// Result alias used by store implementations.
pub type StoreResult<T> = std::result::Result<T, PersistenceError>;

/// Key/filter lookups and whole-document writes over the two collections.
pub trait Store {
    /// Exact, case-sensitive lookup by unique name.
    fn find_tech_stack(&self, name: &str) -> StoreResult<Option<TechStack>>;
    fn get_tech_stack(&self, id: Uuid) -> StoreResult<Option<TechStack>>;
    fn list_tech_stacks(&self) -> StoreResult<Vec<TechStack>>;
    /// Fails with [`PersistenceError::Conflict`] when the name is taken.
    fn insert_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack>;
    /// Overwrites the record with the same id.
    fn replace_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack>;
    fn delete_tech_stack(&mut self, id: Uuid) -> StoreResult<()>;

    fn get_roadmap(&self, id: Uuid) -> StoreResult<Option<Roadmap>>;
    fn list_roadmaps(&self) -> StoreResult<Vec<Roadmap>>;
    fn insert_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap>;
    fn replace_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap>;
    fn delete_roadmap(&mut self, id: Uuid) -> StoreResult<()>;
}
