//! Roadmap bookkeeping: per-company, per-role bundles of tech stacks.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::techstack::tools::error::{Result, ToolError};
use crate::techstack::tools::model::{Roadmap, RoleTrack};
use crate::techstack::tools::store::Store;

/// Fields supplied when creating a roadmap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapDraft {
    pub company: String,
    pub role: String,
    pub tech_stacks: Vec<String>,
    pub roles: Vec<RoleTrack>,
}

/// Replacement lists for an existing roadmap; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapUpdate {
    pub tech_stacks: Option<Vec<String>>,
    pub roles: Option<Vec<RoleTrack>>,
}

#[instrument(level = "info", skip_all, fields(company = %draft.company, role = %draft.role))]
pub fn create_roadmap<S: Store + ?Sized>(store: &mut S, draft: RoadmapDraft) -> Result<Roadmap> {
    let company = required(&draft.company, "company")?;
    let role = required(&draft.role, "role")?;

    let mut roadmap = Roadmap::new(company, role);
    roadmap.tech_stacks = draft.tech_stacks;
    roadmap.roles = draft.roles;
    ensure_stacks_exist(store, &roadmap)?;

    let stored = store.insert_roadmap(roadmap)?;
    info!(id = %stored.id, consolidated = stored.is_consolidated(), "roadmap created");
    Ok(stored)
}

pub fn get_roadmap<S: Store + ?Sized>(store: &S, id: Uuid) -> Result<Roadmap> {
    store.get_roadmap(id)?.ok_or(ToolError::UnknownRoadmap(id))
}

pub fn list_roadmaps<S: Store + ?Sized>(store: &S) -> Result<Vec<Roadmap>> {
    Ok(store.list_roadmaps()?)
}

/// Roadmaps of a company, optionally narrowed to one role. Both comparisons
/// ignore case and surrounding whitespace.
pub fn find_roadmaps<S: Store + ?Sized>(
    store: &S,
    company: &str,
    role: Option<&str>,
) -> Result<Vec<Roadmap>> {
    let matches = |left: &str, right: &str| left.trim().eq_ignore_ascii_case(right.trim());
    Ok(store
        .list_roadmaps()?
        .into_iter()
        .filter(|roadmap| matches(&roadmap.company, company))
        .filter(|roadmap| role.is_none_or(|role| matches(&roadmap.role, role)))
        .collect())
}

#[instrument(level = "info", skip(store, update))]
pub fn update_roadmap<S: Store + ?Sized>(
    store: &mut S,
    id: Uuid,
    update: RoadmapUpdate,
) -> Result<Roadmap> {
    let mut roadmap = get_roadmap(store, id)?;
    if let Some(tech_stacks) = update.tech_stacks {
        roadmap.tech_stacks = tech_stacks;
    }
    if let Some(roles) = update.roles {
        roadmap.roles = roles;
    }
    ensure_stacks_exist(store, &roadmap)?;
    roadmap.touch();
    let stored = store.replace_roadmap(roadmap)?;
    info!("roadmap updated");
    Ok(stored)
}

#[instrument(level = "info", skip(store))]
pub fn delete_roadmap<S: Store + ?Sized>(store: &mut S, id: Uuid) -> Result<()> {
    get_roadmap(store, id)?;
    store.delete_roadmap(id)?;
    info!("roadmap deleted");
    Ok(())
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn ensure_stacks_exist<S: Store + ?Sized>(store: &S, roadmap: &Roadmap) -> Result<()> {
    for name in roadmap.referenced_stacks() {
        if store.find_tech_stack(name)?.is_none() {
            return Err(ToolError::UnknownTechStack(name.to_string()));
        }
    }
    Ok(())
}
