//! Interactive editing of stored tech stacks, one roadmap item at a time.

use indexmap::IndexSet;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::techstack::tools::error::{Result, ToolError};
use crate::techstack::tools::model::{CompletionStatus, NamedEntry, RoadmapItem, TechStack};
use crate::techstack::tools::store::Store;

/// Fields of a roadmap item being added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub topic: String,
    pub sub_topics: Vec<String>,
    pub projects: Vec<String>,
    pub status: CompletionStatus,
}

/// Partial update of a roadmap item; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub topic: Option<String>,
    pub sub_topics: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub status: Option<CompletionStatus>,
}

pub fn list_tech_stacks<S: Store + ?Sized>(store: &S) -> Result<Vec<TechStack>> {
    Ok(store.list_tech_stacks()?)
}

pub fn get_tech_stack<S: Store + ?Sized>(store: &S, name: &str) -> Result<TechStack> {
    store
        .find_tech_stack(name)?
        .ok_or_else(|| ToolError::UnknownTechStack(name.to_string()))
}

#[instrument(level = "info", skip(store))]
pub fn delete_tech_stack<S: Store + ?Sized>(store: &mut S, name: &str) -> Result<()> {
    let stack = get_tech_stack(store, name)?;
    store.delete_tech_stack(stack.id)?;
    info!("tech stack deleted");
    Ok(())
}

#[instrument(level = "info", skip(store, item), fields(topic = %item.topic))]
pub fn add_roadmap_item<S: Store + ?Sized>(
    store: &mut S,
    stack_name: &str,
    item: NewItem,
) -> Result<RoadmapItem> {
    let mut stack = get_tech_stack(store, stack_name)?;
    let topic = clean_topic(&item.topic)?;
    ensure_unique_topic(&stack, &topic, None)?;

    let created = RoadmapItem {
        sub_topics: to_entries(item.sub_topics),
        projects: to_entries(item.projects),
        completion_status: item.status,
        ..RoadmapItem::new(topic)
    };
    stack.roadmap_items.push(created.clone());
    stack.touch();
    store.replace_tech_stack(stack)?;
    info!(item = %created.id, "roadmap item added");
    Ok(created)
}

#[instrument(level = "info", skip(store, patch))]
pub fn update_roadmap_item<S: Store + ?Sized>(
    store: &mut S,
    stack_name: &str,
    item_id: Uuid,
    patch: ItemPatch,
) -> Result<RoadmapItem> {
    let mut stack = get_tech_stack(store, stack_name)?;
    let index = item_index(&stack, item_id)?;

    if let Some(topic) = &patch.topic {
        let topic = clean_topic(topic)?;
        ensure_unique_topic(&stack, &topic, Some(item_id))?;
        stack.roadmap_items[index].topic = topic;
    }
    let item = &mut stack.roadmap_items[index];
    if let Some(sub_topics) = patch.sub_topics {
        item.sub_topics = to_entries(sub_topics);
    }
    if let Some(projects) = patch.projects {
        item.projects = to_entries(projects);
    }
    if let Some(status) = patch.status {
        item.completion_status = status;
    }
    let updated = item.clone();

    stack.touch();
    store.replace_tech_stack(stack)?;
    info!("roadmap item updated");
    Ok(updated)
}

#[instrument(level = "info", skip(store))]
pub fn delete_roadmap_item<S: Store + ?Sized>(
    store: &mut S,
    stack_name: &str,
    item_id: Uuid,
) -> Result<()> {
    let mut stack = get_tech_stack(store, stack_name)?;
    let index = item_index(&stack, item_id)?;
    stack.roadmap_items.remove(index);
    stack.touch();
    store.replace_tech_stack(stack)?;
    info!("roadmap item deleted");
    Ok(())
}

fn item_index(stack: &TechStack, item_id: Uuid) -> Result<usize> {
    stack
        .roadmap_items
        .iter()
        .position(|item| item.id == item_id)
        .ok_or_else(|| ToolError::UnknownRoadmapItem {
            stack: stack.name.clone(),
            item: item_id,
        })
}

fn clean_topic(topic: &str) -> Result<String> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ToolError::EmptyField("topic"));
    }
    Ok(topic.to_string())
}

fn ensure_unique_topic(stack: &TechStack, topic: &str, except: Option<Uuid>) -> Result<()> {
    let taken = stack
        .roadmap_items
        .iter()
        .any(|item| item.topic == topic && Some(item.id) != except);
    if taken {
        return Err(ToolError::DuplicateTopic {
            stack: stack.name.clone(),
            topic: topic.to_string(),
        });
    }
    Ok(())
}

/// Trims names, drops blanks, and keeps the first occurrence of each name.
fn to_entries(names: Vec<String>) -> Vec<NamedEntry> {
    let unique: IndexSet<String> = names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    unique.into_iter().map(NamedEntry::new).collect()
}
