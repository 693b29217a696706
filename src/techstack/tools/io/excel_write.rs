use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::techstack::tools::error::Result;
use crate::techstack::tools::io::csv_write::join_names;
use crate::techstack::tools::model::TechStack;

/// Longest sheet name Excel accepts.
const MAX_SHEET_NAME: usize = 31;

/// Writes each tech stack to its own sheet using the stack's header labels.
pub fn write_tech_stacks(path: &Path, stacks: &[TechStack]) -> Result<()> {
    let mut workbook = Workbook::new();
    let mut sheet_names = SheetNameRegistry::default();
    let wrap = Format::new().set_text_wrap();

    for stack in stacks {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_names.assign(&stack.name))?;

        for (col_idx, label) in stack.headers.labels().iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, *label)?;
        }

        for (row_idx, item) in stack.roadmap_items.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            worksheet.write_string(row, 0, &item.topic)?;
            worksheet.write_string_with_format(row, 1, join_names(&item.sub_topics), &wrap)?;
            worksheet.write_string_with_format(row, 2, join_names(&item.projects), &wrap)?;
            worksheet.write_string(row, 3, item.completion_status.as_str())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[derive(Debug, Default)]
struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix = truncate_chars(&base, MAX_SHEET_NAME - suffix.len());
            let candidate = format!("{prefix}{suffix}");
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Replaces characters Excel rejects in sheet names and enforces the length limit.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "Sheet".to_string();
    }
    truncate_chars(sanitized, MAX_SHEET_NAME)
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
