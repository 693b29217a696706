use std::fs;
use std::path::Path;

use crate::techstack::tools::error::Result;
use crate::techstack::tools::model::{Headers, NamedEntry, RoadmapItem};

/// Quotes a field only when it contains a comma, a double quote, or a line break.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders items as a four-column CSV document using `headers` as labels.
/// Multi-valued cells are newline-joined.
pub fn render_items(headers: &Headers, items: &[RoadmapItem]) -> String {
    let mut out = String::new();
    push_record(&mut out, headers.labels());
    for item in items {
        let sub_topics = join_names(&item.sub_topics);
        let projects = join_names(&item.projects);
        push_record(
            &mut out,
            [
                item.topic.as_str(),
                sub_topics.as_str(),
                projects.as_str(),
                item.completion_status.as_str(),
            ],
        );
    }
    out
}

/// Writes [`render_items`] output to `path`.
pub fn write_items(path: &Path, headers: &Headers, items: &[RoadmapItem]) -> Result<()> {
    fs::write(path, render_items(headers, items))?;
    Ok(())
}

/// File name a stack is converted into. Only characters no filesystem
/// accepts in a file name are replaced, so the stem reads back as `name`.
pub fn csv_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\' | '\0') { '_' } else { ch })
        .collect();
    format!("{stem}.csv")
}

fn push_record(out: &mut String, fields: [&str; 4]) {
    let line: Vec<String> = fields.iter().map(|field| escape_field(field)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

pub(crate) fn join_names(entries: &[NamedEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
