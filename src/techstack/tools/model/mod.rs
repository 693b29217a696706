use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display label for the topic column.
pub const DEFAULT_TOPIC_LABEL: &str = "Topic";
/// Default display label for the sub-topics column.
pub const DEFAULT_SUB_TOPICS_LABEL: &str = "Sub-Topics";
/// Default display label for the projects column.
pub const DEFAULT_PROJECTS_LABEL: &str = "Projects";
/// Default display label for the status column.
pub const DEFAULT_STATUS_LABEL: &str = "Status";

/// Progress of a single topic.
///
/// Variants are declared in priority order so that `Ord` reflects how far a
/// topic has advanced; merging two observations keeps the maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompletionStatus {
    #[default]
    #[serde(rename = "Yet to Start")]
    YetToStart,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl CompletionStatus {
    /// Canonical label used in stored documents and CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionStatus::YetToStart => "Yet to Start",
            CompletionStatus::InProgress => "In Progress",
            CompletionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named leaf entry of a roadmap item (a sub-topic or a project).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Display labels for the four logical columns of a tech stack sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headers {
    pub topic: String,
    pub sub_topics: String,
    pub projects: String,
    pub status: String,
}

impl Default for Headers {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC_LABEL.to_string(),
            sub_topics: DEFAULT_SUB_TOPICS_LABEL.to_string(),
            projects: DEFAULT_PROJECTS_LABEL.to_string(),
            status: DEFAULT_STATUS_LABEL.to_string(),
        }
    }
}

impl Headers {
    /// Labels in canonical column order.
    pub fn labels(&self) -> [&str; 4] {
        [
            self.topic.as_str(),
            self.sub_topics.as_str(),
            self.projects.as_str(),
            self.status.as_str(),
        ]
    }
}

/// One topic entry of a tech stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapItem {
    pub id: Uuid,
    pub topic: String,
    #[serde(default)]
    pub sub_topics: Vec<NamedEntry>,
    #[serde(default)]
    pub projects: Vec<NamedEntry>,
    #[serde(default)]
    pub completion_status: CompletionStatus,
}

impl RoadmapItem {
    /// Creates an item with a fresh identifier and no children.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            sub_topics: Vec::new(),
            projects: Vec::new(),
            completion_status: CompletionStatus::default(),
        }
    }

    pub fn sub_topic_names(&self) -> Vec<&str> {
        self.sub_topics.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.projects.iter().map(|entry| entry.name.as_str()).collect()
    }
}

/// A named curriculum composed of ordered topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub roadmap_items: Vec<RoadmapItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TechStack {
    /// Creates an empty tech stack stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            headers: Headers::default(),
            roadmap_items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the record as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Tech stacks followed by one role inside a consolidated roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTrack {
    pub role: String,
    #[serde(default)]
    pub tech_stacks: Vec<String>,
}

/// Per-company, per-role bundle of tech stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub tech_stacks: Vec<String>,
    /// Additional role tracks; non-empty for a consolidated roadmap.
    #[serde(default)]
    pub roles: Vec<RoleTrack>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roadmap {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company: company.into(),
            role: role.into(),
            tech_stacks: Vec::new(),
            roles: Vec::new(),
            url: None,
            filename: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_consolidated(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Every tech stack name referenced by the roadmap, primary role first.
    pub fn referenced_stacks(&self) -> impl Iterator<Item = &str> {
        self.tech_stacks.iter().map(String::as_str).chain(
            self.roles
                .iter()
                .flat_map(|track| track.tech_stacks.iter().map(String::as_str)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_with_display_labels() {
        let json = serde_json::to_string(&CompletionStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: CompletionStatus = serde_json::from_str("\"Yet to Start\"").unwrap();
        assert_eq!(parsed, CompletionStatus::YetToStart);
    }

    #[test]
    fn status_order_matches_priority() {
        assert!(CompletionStatus::YetToStart < CompletionStatus::InProgress);
        assert!(CompletionStatus::InProgress < CompletionStatus::Completed);
    }

    #[test]
    fn tech_stack_uses_camel_case_fields() {
        let mut stack = TechStack::new("React");
        stack.roadmap_items.push(RoadmapItem::new("Hooks"));
        let value = serde_json::to_value(&stack).unwrap();
        assert!(value.get("roadmapItems").is_some());
        assert_eq!(value["headers"]["subTopics"], "Sub-Topics");
        assert_eq!(value["roadmapItems"][0]["completionStatus"], "Yet to Start");
    }
}
