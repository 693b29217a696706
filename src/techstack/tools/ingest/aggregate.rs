use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::techstack::tools::ingest::headers::ColumnMap;
use crate::techstack::tools::ingest::status::{merge_status, normalize_status};
use crate::techstack::tools::io::tabular::{Row, cell};
use crate::techstack::tools::model::{CompletionStatus, NamedEntry, RoadmapItem};

/// Policy knobs for [`aggregate_rows`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// When set, a blank topic cell inherits the last topic seen above it.
    /// Otherwise rows without their own topic are dropped.
    pub carry_forward_topic: bool,
}

impl AggregateOptions {
    /// Sparse topic column, as laid out in hand-edited workbooks.
    pub fn workbook() -> Self {
        Self {
            carry_forward_topic: true,
        }
    }

    /// One topic per row, as produced by `convert`.
    pub fn flat() -> Self {
        Self {
            carry_forward_topic: false,
        }
    }
}

#[derive(Debug)]
struct TopicRecord {
    sub_topics: IndexSet<String>,
    projects: IndexSet<String>,
    status: CompletionStatus,
}

impl TopicRecord {
    fn new() -> Self {
        Self {
            sub_topics: IndexSet::new(),
            projects: IndexSet::new(),
            status: CompletionStatus::YetToStart,
        }
    }
}

/// Folds data rows (header row excluded) into one item per distinct topic,
/// in order of first appearance.
pub fn aggregate_rows(rows: &[Row], columns: &ColumnMap, options: AggregateOptions) -> Vec<RoadmapItem> {
    let mut records: IndexMap<String, TopicRecord> = IndexMap::new();
    let mut current: Option<String> = None;

    for (offset, row) in rows.iter().enumerate() {
        let topic = cell(row, Some(columns.topic)).trim();
        if !topic.is_empty() {
            current = Some(topic.to_string());
        } else if !options.carry_forward_topic {
            current = None;
        }

        let Some(topic) = current.as_deref() else {
            debug!(row = offset + 2, "row has no topic; skipped");
            continue;
        };
        let record = records
            .entry(topic.to_string())
            .or_insert_with(TopicRecord::new);

        record.sub_topics.extend(split_entries(cell(row, columns.sub_topics)));
        record.projects.extend(split_entries(cell(row, columns.projects)));

        let status = cell(row, columns.status);
        if !status.trim().is_empty() {
            record.status = merge_status(record.status, normalize_status(status));
        }
    }

    records
        .into_iter()
        .map(|(topic, record)| RoadmapItem {
            sub_topics: record.sub_topics.into_iter().map(NamedEntry::new).collect(),
            projects: record.projects.into_iter().map(NamedEntry::new).collect(),
            completion_status: record.status,
            ..RoadmapItem::new(topic)
        })
        .collect()
}

/// Splits a multi-line cell into trimmed, non-empty entries.
pub fn split_entries(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split('\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
}
