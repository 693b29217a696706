#![allow(dead_code)]

use std::path::Path;

use rust_xlsxwriter::Workbook;
use techstack_tools::model::TechStack;

/// Writes a workbook with one sheet per `(name, rows)` pair. The first row is the header.
pub fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet named");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, *value)
                    .expect("cell written");
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

/// Comparable view of a stack's items: topic, sub-topics, projects, status.
pub fn outline(stack: &TechStack) -> Vec<(String, Vec<String>, Vec<String>, String)> {
    stack
        .roadmap_items
        .iter()
        .map(|item| {
            (
                item.topic.clone(),
                item.sub_topic_names().into_iter().map(str::to_string).collect(),
                item.project_names().into_iter().map(str::to_string).collect(),
                item.completion_status.to_string(),
            )
        })
        .collect()
}
