use tracing::{debug, info};

use crate::techstack::tools::error::PersistenceError;
use crate::techstack::tools::model::{Headers, RoadmapItem, TechStack};
use crate::techstack::tools::store::Store;

/// Everything an ingestion run knows about one tech stack.
#[derive(Debug, Clone, PartialEq)]
pub struct TechStackDraft {
    pub name: String,
    /// Replaces the stored description when present; kept otherwise.
    pub description: Option<String>,
    pub headers: Headers,
    pub items: Vec<RoadmapItem>,
}

/// Creates the named tech stack, or overwrites headers and items of the
/// existing one wholesale.
pub fn upsert_tech_stack<S: Store + ?Sized>(
    store: &mut S,
    draft: TechStackDraft,
) -> Result<TechStack, PersistenceError> {
    let TechStackDraft {
        name,
        description,
        headers,
        items,
    } = draft;

    match store.find_tech_stack(&name)? {
        Some(mut existing) => {
            if description.is_some() {
                existing.description = description;
            }
            existing.headers = headers;
            existing.roadmap_items = items;
            existing.touch();
            let stored = store.replace_tech_stack(existing)?;
            info!(name = %stored.name, topic_count = stored.roadmap_items.len(), "tech stack updated");
            Ok(stored)
        }
        None => {
            debug!(name = %name, "no existing tech stack; creating");
            let mut stack = TechStack::new(name);
            stack.description = description;
            stack.headers = headers;
            stack.roadmap_items = items;
            let stored = store.insert_tech_stack(stack)?;
            info!(name = %stored.name, topic_count = stored.roadmap_items.len(), "tech stack created");
            Ok(stored)
        }
    }
}
