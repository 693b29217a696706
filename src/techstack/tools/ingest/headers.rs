use crate::techstack::tools::model::{
    DEFAULT_PROJECTS_LABEL, DEFAULT_STATUS_LABEL, DEFAULT_SUB_TOPICS_LABEL, Headers,
};

const TOPIC_SYNONYMS: [&str; 3] = ["topic", "topics", "technology"];
const SUB_TOPIC_SYNONYMS: [&str; 4] = ["sub-topic", "subtopic", "sub-topics", "subtopics"];
const PROJECT_SYNONYMS: [&str; 6] = [
    "project",
    "task",
    "app",
    "project/app to build",
    "projects/apps built",
    "application",
];
const STATUS_SYNONYMS: [&str; 3] = ["status", "status of completion", "completion"];

/// How the topic column is told apart from the sub-topic column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopicMatch {
    /// Headers containing "sub" never match the topic field.
    #[default]
    Strict,
    /// Any header containing a topic synonym matches, including "Sub-Topics".
    Loose,
}

/// Column index of each logical field. Optional fields are `None` when the
/// sheet lacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub topic: usize,
    pub sub_topics: Option<usize>,
    pub projects: Option<usize>,
    pub status: Option<usize>,
}

/// Result of resolving a header row that contains a topic column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeaders {
    pub columns: ColumnMap,
    pub headers: Headers,
}

/// Resolves the header row. Returns `None` when no topic column exists.
pub fn resolve_headers(row: &[String], policy: TopicMatch) -> Option<ResolvedHeaders> {
    let trimmed: Vec<&str> = row.iter().map(|header| header.trim()).collect();

    let topic = find_column(&trimmed, &TOPIC_SYNONYMS, |lowered| {
        policy == TopicMatch::Loose || !lowered.contains("sub")
    })?;
    let columns = ColumnMap {
        topic,
        sub_topics: find_column(&trimmed, &SUB_TOPIC_SYNONYMS, |_| true),
        projects: find_column(&trimmed, &PROJECT_SYNONYMS, |_| true),
        status: find_column(&trimmed, &STATUS_SYNONYMS, |_| true),
    };

    let label = |index: Option<usize>, default: &str| {
        index
            .map(|index| trimmed[index].to_string())
            .unwrap_or_else(|| default.to_string())
    };
    let headers = Headers {
        topic: trimmed[topic].to_string(),
        sub_topics: label(columns.sub_topics, DEFAULT_SUB_TOPICS_LABEL),
        projects: label(columns.projects, DEFAULT_PROJECTS_LABEL),
        status: label(columns.status, DEFAULT_STATUS_LABEL),
    };

    Some(ResolvedHeaders { columns, headers })
}

fn find_column(headers: &[&str], synonyms: &[&str], accept: impl Fn(&str) -> bool) -> Option<usize> {
    headers.iter().position(|header| {
        let lowered = header.to_lowercase();
        synonyms.iter().any(|synonym| lowered.contains(synonym)) && accept(&lowered)
    })
}
