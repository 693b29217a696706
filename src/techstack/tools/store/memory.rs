use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::techstack::tools::error::PersistenceError;
use crate::techstack::tools::model::{Roadmap, TechStack};

/// In-process store keeping records in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    #[serde(default, with = "records")]
    tech_stacks: IndexMap<Uuid, TechStack>,
    #[serde(default, with = "records")]
    roadmaps: IndexMap<Uuid, Roadmap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn name_owner(&self, name: &str) -> Option<Uuid> {
        self.tech_stacks
            .values()
            .find(|stack| stack.name == name)
            .map(|stack| stack.id)
    }
}

impl Store for MemoryStore {
    fn find_tech_stack(&self, name: &str) -> StoreResult<Option<TechStack>> {
        Ok(self
            .name_owner(name)
            .and_then(|id| self.tech_stacks.get(&id).cloned()))
    }

    fn get_tech_stack(&self, id: Uuid) -> StoreResult<Option<TechStack>> {
        Ok(self.tech_stacks.get(&id).cloned())
    }

    fn list_tech_stacks(&self) -> StoreResult<Vec<TechStack>> {
        Ok(self.tech_stacks.values().cloned().collect())
    }

    fn insert_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack> {
        if self.name_owner(&stack.name).is_some() {
            return Err(PersistenceError::Conflict(format!(
                "tech stack '{}' already exists",
                stack.name
            )));
        }
        if self.tech_stacks.contains_key(&stack.id) {
            return Err(PersistenceError::Conflict(format!("duplicate id {}", stack.id)));
        }
        self.tech_stacks.insert(stack.id, stack.clone());
        Ok(stack)
    }

    fn replace_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack> {
        if !self.tech_stacks.contains_key(&stack.id) {
            return Err(PersistenceError::NotFound(stack.id));
        }
        if let Some(owner) = self.name_owner(&stack.name) {
            if owner != stack.id {
                return Err(PersistenceError::Conflict(format!(
                    "tech stack '{}' already exists",
                    stack.name
                )));
            }
        }
        self.tech_stacks.insert(stack.id, stack.clone());
        Ok(stack)
    }

    fn delete_tech_stack(&mut self, id: Uuid) -> StoreResult<()> {
        self.tech_stacks
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(PersistenceError::NotFound(id))
    }

    fn get_roadmap(&self, id: Uuid) -> StoreResult<Option<Roadmap>> {
        Ok(self.roadmaps.get(&id).cloned())
    }

    fn list_roadmaps(&self) -> StoreResult<Vec<Roadmap>> {
        Ok(self.roadmaps.values().cloned().collect())
    }

    fn insert_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap> {
        if self.roadmaps.contains_key(&roadmap.id) {
            return Err(PersistenceError::Conflict(format!("duplicate id {}", roadmap.id)));
        }
        self.roadmaps.insert(roadmap.id, roadmap.clone());
        Ok(roadmap)
    }

    fn replace_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap> {
        if !self.roadmaps.contains_key(&roadmap.id) {
            return Err(PersistenceError::NotFound(roadmap.id));
        }
        self.roadmaps.insert(roadmap.id, roadmap.clone());
        Ok(roadmap)
    }

    fn delete_roadmap(&mut self, id: Uuid) -> StoreResult<()> {
        self.roadmaps
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(PersistenceError::NotFound(id))
    }
}

/// Serialises keyed collections as plain arrays of documents.
mod records {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use uuid::Uuid;

    pub trait Keyed {
        fn key(&self) -> Uuid;
    }

    impl Keyed for crate::techstack::tools::model::TechStack {
        fn key(&self) -> Uuid {
            self.id
        }
    }

    impl Keyed for crate::techstack::tools::model::Roadmap {
        fn key(&self) -> Uuid {
            self.id
        }
    }

    pub fn serialize<S, T>(map: &IndexMap<Uuid, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<IndexMap<Uuid, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Keyed,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|item| (item.key(), item)).collect())
    }
}
