use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, info_span, instrument, warn};

use crate::techstack::tools::error::{PersistenceError, Result, ToolError};
use crate::techstack::tools::ingest::{
    AggregateOptions, ParsedSheet, TechStackDraft, TopicMatch, parse_sheet, upsert_tech_stack,
};
use crate::techstack::tools::io::csv_write;
use crate::techstack::tools::io::tabular::{self, SkipReason, WorkbookReader, is_reserved_sheet};
use crate::techstack::tools::store::Store;

/// Outcome of a batch run, one entry per sheet or file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub processed: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    fn record_processed(&mut self, unit: &str, total: usize) {
        self.processed.push(unit.to_string());
        info!(unit, processed = self.processed.len(), total, "unit processed");
    }

    fn record_skipped(&mut self, unit: &str, reason: SkipReason) {
        warn!(unit, %reason, "unit skipped");
        self.skipped.push((unit.to_string(), reason));
    }

    fn record_failed(&mut self, unit: &str, error: &ToolError) {
        error!(unit, %error, "unit failed");
        self.failed.push((unit.to_string(), error.to_string()));
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}, skipped {}, failed {}",
            self.processed.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Imports every sheet of a workbook as one tech stack per sheet.
#[instrument(level = "info", skip_all, fields(input = %input.display(), ?topic_match))]
pub fn import_workbook<S: Store + ?Sized>(
    store: &mut S,
    input: &Path,
    topic_match: TopicMatch,
) -> Result<RunSummary> {
    let mut reader = WorkbookReader::open(input)?;
    let sheets = reader.sheet_names();
    let total = sheets.len();
    info!(sheet_count = total, "workbook opened");

    let mut summary = RunSummary::default();
    for sheet in &sheets {
        let _span = info_span!("sheet", sheet = %sheet).entered();
        let Some(parsed) = read_workbook_sheet(&mut reader, sheet, topic_match, &mut summary) else {
            continue;
        };
        let draft = TechStackDraft {
            name: sheet.clone(),
            description: None,
            headers: parsed.headers,
            items: parsed.items,
        };
        persist(store, draft, total, &mut summary)?;
    }

    info!(%summary, "import finished");
    Ok(summary)
}

/// Writes one normalized CSV per valid sheet into `out_dir` without touching a store.
/// Sheets without any topic value are skipped since a header-only file cannot
/// be uploaded again.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %out_dir.display(), ?topic_match)
)]
pub fn convert_workbook(input: &Path, out_dir: &Path, topic_match: TopicMatch) -> Result<RunSummary> {
    let mut reader = WorkbookReader::open(input)?;
    fs::create_dir_all(out_dir)?;
    let sheets = reader.sheet_names();
    let total = sheets.len();

    let mut outputs = OutputFiles::new(out_dir);
    let mut summary = RunSummary::default();
    for sheet in &sheets {
        let _span = info_span!("sheet", sheet = %sheet).entered();
        let Some(parsed) = read_workbook_sheet(&mut reader, sheet, topic_match, &mut summary) else {
            continue;
        };
        if parsed.items.is_empty() {
            summary.record_skipped(sheet, SkipReason::NoTopicValues);
            continue;
        }
        let target = match outputs.claim(sheet) {
            Ok(target) => target,
            Err(error) => {
                summary.record_failed(sheet, &error);
                continue;
            }
        };
        match csv_write::write_items(&target, &parsed.headers, &parsed.items) {
            Ok(()) => summary.record_processed(sheet, total),
            Err(error) => summary.record_failed(sheet, &error),
        }
    }

    info!(%summary, "conversion finished");
    Ok(summary)
}

/// Ingests a single CSV file into the tech stack called `name`. A file whose
/// stem is a reserved name is skipped whatever `name` says.
#[instrument(level = "info", skip_all, fields(input = %input.display(), name = %name, ?topic_match))]
pub fn upload_csv<S: Store + ?Sized>(
    store: &mut S,
    input: &Path,
    name: &str,
    description: Option<String>,
    topic_match: TopicMatch,
) -> Result<RunSummary> {
    if !input.is_file() {
        return Err(ToolError::SourceNotFound(input.to_path_buf()));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::EmptyField("tech stack name"));
    }

    let mut summary = RunSummary::default();
    if let Some(stem) = input.file_stem().map(|stem| stem.to_string_lossy())
        && is_reserved_sheet(&stem)
    {
        summary.record_skipped(&stem, SkipReason::ReservedName);
        return Ok(summary);
    }
    ingest_csv_file(store, input, name, description, topic_match, 1, &mut summary)?;
    info!(%summary, "upload finished");
    Ok(summary)
}

/// Ingests every `.csv` file of a directory; each file stem names a tech stack.
#[instrument(level = "info", skip_all, fields(input = %dir.display(), ?topic_match))]
pub fn upload_csv_dir<S: Store + ?Sized>(
    store: &mut S,
    dir: &Path,
    topic_match: TopicMatch,
) -> Result<RunSummary> {
    let files = csv_files(dir)?;
    let total = files.len();
    info!(file_count = total, "csv files found");

    let mut summary = RunSummary::default();
    for file in &files {
        let Some(name) = file.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
            continue;
        };
        let _span = info_span!("file", name = %name).entered();
        ingest_csv_file(store, file, &name, None, topic_match, total, &mut summary)?;
    }

    info!(%summary, "upload finished");
    Ok(summary)
}

/// Sorted `.csv` files directly inside `dir`.
pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ToolError::SourceNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_workbook_sheet(
    reader: &mut WorkbookReader,
    sheet: &str,
    topic_match: TopicMatch,
    summary: &mut RunSummary,
) -> Option<ParsedSheet> {
    if is_reserved_sheet(sheet) {
        summary.record_skipped(sheet, SkipReason::ReservedName);
        return None;
    }
    let rows = match reader.read_sheet(sheet) {
        Ok(rows) => rows,
        Err(error) => {
            summary.record_failed(sheet, &error);
            return None;
        }
    };
    parse_unit(sheet, &rows, topic_match, AggregateOptions::workbook(), summary)
}

fn ingest_csv_file<S: Store + ?Sized>(
    store: &mut S,
    path: &Path,
    name: &str,
    description: Option<String>,
    topic_match: TopicMatch,
    total: usize,
    summary: &mut RunSummary,
) -> Result<()> {
    let rows = match tabular::read_csv(path) {
        Ok(rows) => rows,
        Err(error) => {
            summary.record_failed(name, &error);
            return Ok(());
        }
    };
    let Some(parsed) = parse_unit(name, &rows, topic_match, AggregateOptions::flat(), summary) else {
        return Ok(());
    };
    let draft = TechStackDraft {
        name: name.to_string(),
        description,
        headers: parsed.headers,
        items: parsed.items,
    };
    persist(store, draft, total, summary)
}

fn parse_unit(
    unit: &str,
    rows: &[tabular::Row],
    topic_match: TopicMatch,
    options: AggregateOptions,
    summary: &mut RunSummary,
) -> Option<ParsedSheet> {
    match parse_sheet(unit, rows, topic_match, options) {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            summary.record_skipped(unit, reason);
            None
        }
    }
}

/// Persists one unit. An unreachable store aborts the run; any other
/// rejection is recorded against the unit.
fn persist<S: Store + ?Sized>(
    store: &mut S,
    draft: TechStackDraft,
    total: usize,
    summary: &mut RunSummary,
) -> Result<()> {
    let name = draft.name.clone();
    if draft.items.is_empty() {
        warn!(unit = %name, "no topic values found; tech stack will be empty");
    }
    match upsert_tech_stack(store, draft) {
        Ok(_) => summary.record_processed(&name, total),
        Err(PersistenceError::Unavailable(reason)) => {
            return Err(PersistenceError::Unavailable(reason).into());
        }
        Err(error) => summary.record_failed(&name, &ToolError::from(error)),
    }
    Ok(())
}

/// CSV targets claimed during one conversion. Names are compared without case
/// so that case-insensitive filesystems cannot merge two sheets into one file.
struct OutputFiles {
    dir: PathBuf,
    claimed: HashSet<String>,
}

impl OutputFiles {
    fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            claimed: HashSet::new(),
        }
    }

    fn claim(&mut self, name: &str) -> Result<PathBuf> {
        let file_name = csv_write::csv_file_name(name);
        let target = self.dir.join(&file_name);
        if !self.claimed.insert(file_name.to_lowercase()) {
            return Err(ToolError::OutputCollision(target));
        }
        Ok(target)
    }
}
