//! Turns loosely structured sheets into normalized tech stacks.
//!
//! [`headers`] locates the logical columns, [`aggregate`] folds rows into
//! topics (calling into [`status`]), and [`sink`] writes the result to a store.

pub mod aggregate;
pub mod headers;
pub mod sink;
pub mod status;

pub use aggregate::{AggregateOptions, aggregate_rows};
pub use headers::{ColumnMap, ResolvedHeaders, TopicMatch, resolve_headers};
pub use sink::{TechStackDraft, upsert_tech_stack};
pub use status::{merge_status, normalize_status};

use crate::techstack::tools::io::tabular::{Row, SkipReason, screen_sheet};
use crate::techstack::tools::model::{Headers, RoadmapItem};

/// A sheet reduced to its display headers and aggregated topics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub headers: Headers,
    pub items: Vec<RoadmapItem>,
}

/// Screens, resolves, and aggregates one sheet worth of rows.
pub fn parse_sheet(
    name: &str,
    rows: &[Row],
    topic_match: TopicMatch,
    options: AggregateOptions,
) -> Result<ParsedSheet, SkipReason> {
    screen_sheet(name, rows)?;
    let resolved = resolve_headers(&rows[0], topic_match).ok_or(SkipReason::MissingTopicColumn)?;
    let items = aggregate_rows(&rows[1..], &resolved.columns, options);
    Ok(ParsedSheet {
        headers: resolved.headers,
        items,
    })
}
