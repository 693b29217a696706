mod common;

use std::fs;

use common::write_workbook;
use techstack_tools::catalog;
use techstack_tools::ingest::TopicMatch;
use techstack_tools::io::tabular::SkipReason;
use techstack_tools::model::{CompletionStatus, NamedEntry, Roadmap, TechStack};
use techstack_tools::pipeline;
use techstack_tools::publish::{self, BlobStore, FsBlobStore};
use techstack_tools::roadmaps::{self, RoadmapDraft};
use techstack_tools::store::{JsonFileStore, MemoryStore, Store, StoreResult};
use techstack_tools::{PersistenceError, ToolError};
use tempfile::tempdir;
use uuid::Uuid;

const REACT: &[&[&str]] = &[
    &["Topic", "Sub-Topics", "Project/App", "Status"],
    &["Hooks", "useState\nuseEffect", "Counter App", "In Progress"],
];
const INSTRUCTIONS: &[&[&str]] = &[&["Topic"], &["Fill one row per topic"]];
const NO_TOPIC: &[&[&str]] = &[&["Name", "Status"], &["Hooks", "Done"]];
const HEADER_ONLY: &[&[&str]] = &[&["Topic", "Status"]];
const BLANK_TOPICS: &[&[&str]] = &[&["Topic", "Sub-Topics"], &["", "orphan"]];

#[test]
fn react_sheet_scenario() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("react.xlsx");
    write_workbook(&xlsx_path, &[("React", REACT)]);

    let mut store = MemoryStore::new();
    pipeline::import_workbook(&mut store, &xlsx_path, TopicMatch::Strict).expect("imported");

    let stacks = store.list_tech_stacks().unwrap();
    assert_eq!(stacks.len(), 1);
    let react = &stacks[0];
    assert_eq!(react.name, "React");
    assert_eq!(react.roadmap_items.len(), 1);
    let item = &react.roadmap_items[0];
    assert_eq!(item.topic, "Hooks");
    assert_eq!(
        item.sub_topics,
        vec![NamedEntry::new("useState"), NamedEntry::new("useEffect")]
    );
    assert_eq!(item.projects, vec![NamedEntry::new("Counter App")]);
    assert_eq!(item.completion_status, CompletionStatus::InProgress);
}

#[test]
fn unusable_sheets_are_skipped_or_left_empty() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("mixed.xlsx");
    write_workbook(
        &xlsx_path,
        &[
            ("Instructions", INSTRUCTIONS),
            ("No Topic", NO_TOPIC),
            ("Header Only", HEADER_ONLY),
            ("Blank Topics", BLANK_TOPICS),
        ],
    );

    let mut store = MemoryStore::new();
    let summary =
        pipeline::import_workbook(&mut store, &xlsx_path, TopicMatch::Strict).expect("imported");

    assert_eq!(
        summary.skipped,
        vec![
            ("Instructions".to_string(), SkipReason::ReservedName),
            ("No Topic".to_string(), SkipReason::MissingTopicColumn),
            ("Header Only".to_string(), SkipReason::TooFewRows),
        ]
    );
    assert!(summary.is_clean());
    assert_eq!(summary.processed, vec!["Blank Topics"]);
    let blank = store.find_tech_stack("Blank Topics").unwrap().expect("stack stored");
    assert!(blank.roadmap_items.is_empty());
}

#[test]
fn missing_sources_abort_the_run() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("missing");
    let mut store = MemoryStore::new();

    assert!(matches!(
        pipeline::import_workbook(&mut store, &missing.with_extension("xlsx"), TopicMatch::Strict),
        Err(ToolError::SourceNotFound(_))
    ));
    assert!(matches!(
        pipeline::upload_csv(&mut store, &missing.with_extension("csv"), "Go", None, TopicMatch::Loose),
        Err(ToolError::SourceNotFound(_))
    ));
    assert!(matches!(
        pipeline::upload_csv_dir(&mut store, &missing, TopicMatch::Loose),
        Err(ToolError::SourceNotFound(_))
    ));
}

#[test]
fn single_csv_upload_replaces_items_and_keeps_description() {
    let temp_dir = tempdir().expect("temporary directory");
    let csv_path = temp_dir.path().join("rust.csv");
    fs::write(
        &csv_path,
        "Topic,Sub-Topics,Projects,Status\r\nOwnership,\"borrowing\r\nlifetimes\",,In progress\r\n,orphan,,Done\r\nOwnership,moves,CLI,Completed\r\n",
    )
    .expect("csv written");

    let mut store = MemoryStore::new();
    pipeline::upload_csv(
        &mut store,
        &csv_path,
        "Rust",
        Some("Systems track".to_string()),
        TopicMatch::Loose,
    )
    .expect("uploaded");

    let rust = catalog::get_tech_stack(&store, "Rust").expect("stack stored");
    assert_eq!(rust.description.as_deref(), Some("Systems track"));
    assert_eq!(rust.roadmap_items.len(), 1);
    let ownership = &rust.roadmap_items[0];
    assert_eq!(ownership.sub_topic_names(), vec!["borrowing", "lifetimes", "moves"]);
    assert_eq!(ownership.project_names(), vec!["CLI"]);
    assert_eq!(ownership.completion_status, CompletionStatus::Completed);

    fs::write(&csv_path, "Topic\nTraits\n").expect("csv rewritten");
    pipeline::upload_csv(&mut store, &csv_path, "Rust", None, TopicMatch::Loose).expect("reuploaded");
    let rust = catalog::get_tech_stack(&store, "Rust").expect("stack stored");
    assert_eq!(rust.description.as_deref(), Some("Systems track"));
    assert_eq!(rust.roadmap_items.len(), 1);
    assert_eq!(rust.roadmap_items[0].topic, "Traits");
}

#[test]
fn topic_match_policy_changes_the_topic_column() {
    let temp_dir = tempdir().expect("temporary directory");
    let csv_path = temp_dir.path().join("python.csv");
    fs::write(&csv_path, "Sub-Topics,Topic\nlists,Collections\n").expect("csv written");

    let mut strict = MemoryStore::new();
    pipeline::upload_csv(&mut strict, &csv_path, "Python", None, TopicMatch::Strict).expect("uploaded");
    let stack = catalog::get_tech_stack(&strict, "Python").expect("stack stored");
    assert_eq!(stack.roadmap_items[0].topic, "Collections");
    assert_eq!(stack.roadmap_items[0].sub_topic_names(), vec!["lists"]);

    let mut loose = MemoryStore::new();
    pipeline::upload_csv(&mut loose, &csv_path, "Python", None, TopicMatch::Loose).expect("uploaded");
    let stack = catalog::get_tech_stack(&loose, "Python").expect("stack stored");
    assert_eq!(stack.roadmap_items[0].topic, "lists");
}

#[test]
fn directory_upload_uses_file_stems_and_skips_readme() {
    let temp_dir = tempdir().expect("temporary directory");
    let dir = temp_dir.path();
    fs::write(dir.join("Go.csv"), "Topic\nConcurrency\n").expect("csv written");
    fs::write(dir.join("Node.CSV"), "Topic\nStreams\n").expect("csv written");
    fs::write(dir.join("readme.csv"), "Topic\nIgnored\n").expect("csv written");
    fs::write(dir.join("notes.txt"), "Topic\nIgnored\n").expect("txt written");

    let mut store = MemoryStore::new();
    let summary = pipeline::upload_csv_dir(&mut store, dir, TopicMatch::Loose).expect("uploaded");

    assert_eq!(summary.processed, vec!["Go", "Node"]);
    assert_eq!(summary.skipped, vec![("readme".to_string(), SkipReason::ReservedName)]);
    let names: Vec<String> = store
        .list_tech_stacks()
        .unwrap()
        .into_iter()
        .map(|stack| stack.name)
        .collect();
    assert_eq!(names, vec!["Go", "Node"]);
}

#[test]
fn single_upload_of_reserved_file_is_skipped_despite_name() {
    let temp_dir = tempdir().expect("temporary directory");
    let csv_path = temp_dir.path().join("Instructions.csv");
    fs::write(&csv_path, "Topic\nIgnored\n").expect("csv written");

    let mut store = MemoryStore::new();
    let summary = pipeline::upload_csv(&mut store, &csv_path, "React", None, TopicMatch::Loose)
        .expect("upload ran");

    assert!(summary.processed.is_empty());
    assert_eq!(
        summary.skipped,
        vec![("Instructions".to_string(), SkipReason::ReservedName)]
    );
    assert!(store.list_tech_stacks().unwrap().is_empty());
}

#[test]
fn rejected_writes_fail_one_file_and_continue() {
    let temp_dir = tempdir().expect("temporary directory");
    let dir = temp_dir.path();
    for name in ["Alpha", "Beta", "Gamma"] {
        fs::write(dir.join(format!("{name}.csv")), "Topic\nBasics\n").expect("csv written");
    }

    let mut store = RejectingStore::new("Beta", || PersistenceError::Conflict("duplicate key".into()));
    let summary = pipeline::upload_csv_dir(&mut store, dir, TopicMatch::Loose).expect("run completed");

    assert_eq!(summary.processed, vec!["Alpha", "Gamma"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "Beta");
    assert!(!summary.is_clean());
}

#[test]
fn unreachable_store_aborts_the_run() {
    let temp_dir = tempdir().expect("temporary directory");
    let dir = temp_dir.path();
    for name in ["Alpha", "Beta", "Gamma"] {
        fs::write(dir.join(format!("{name}.csv")), "Topic\nBasics\n").expect("csv written");
    }

    let mut store = RejectingStore::new("Beta", || PersistenceError::Unavailable("offline".into()));
    let result = pipeline::upload_csv_dir(&mut store, dir, TopicMatch::Loose);

    assert!(matches!(
        result,
        Err(ToolError::Persistence(PersistenceError::Unavailable(_)))
    ));
    assert!(store.inner.find_tech_stack("Alpha").unwrap().is_some());
    assert!(store.inner.find_tech_stack("Gamma").unwrap().is_none());
}

#[test]
fn json_store_keeps_imports_between_runs() {
    let temp_dir = tempdir().expect("temporary directory");
    let store_path = temp_dir.path().join("store.json");
    let csv_path = temp_dir.path().join("go.csv");
    fs::write(&csv_path, "Topic,Status\nModules,done\n").expect("csv written");

    {
        let mut store = JsonFileStore::open(&store_path).expect("store opened");
        pipeline::upload_csv(&mut store, &csv_path, "Go", None, TopicMatch::Loose).expect("uploaded");
    }

    let store = JsonFileStore::open(&store_path).expect("store reopened");
    let go = catalog::get_tech_stack(&store, "Go").expect("stack persisted");
    assert_eq!(go.roadmap_items[0].completion_status, CompletionStatus::Completed);

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store_path).expect("store read")).expect("json");
    assert_eq!(document["techStacks"][0]["roadmapItems"][0]["completionStatus"], "Completed");
}

#[test]
fn publishing_records_url_and_filename() {
    let temp_dir = tempdir().expect("temporary directory");
    let mut store = MemoryStore::new();
    store.insert_tech_stack(TechStack::new("React")).expect("stack stored");
    let roadmap = roadmaps::create_roadmap(
        &mut store,
        RoadmapDraft {
            company: "Acme".to_string(),
            role: "Frontend Engineer".to_string(),
            tech_stacks: vec!["React".to_string()],
            roles: Vec::new(),
        },
    )
    .expect("roadmap created");

    let mut blobs = FsBlobStore::new(temp_dir.path(), "https://static.example.com");
    let published = publish::publish_roadmap(&mut store, &mut blobs, roadmap.id, b"<html></html>")
        .expect("published");

    assert_eq!(published.filename.as_deref(), Some("acme-frontend-engineer.html"));
    assert_eq!(
        published.url.as_deref(),
        Some("https://static.example.com/roadmaps/acme-frontend-engineer.html")
    );
    assert_eq!(
        blobs.fetch("roadmaps/acme-frontend-engineer.html").expect("fetched"),
        Some(b"<html></html>".to_vec())
    );
    let stored: Roadmap = roadmaps::get_roadmap(&store, roadmap.id).expect("roadmap stored");
    assert_eq!(stored.url, published.url);
}

/// Store that rejects writes for one tech stack name.
struct RejectingStore {
    inner: MemoryStore,
    reject: &'static str,
    error: fn() -> PersistenceError,
}

impl RejectingStore {
    fn new(reject: &'static str, error: fn() -> PersistenceError) -> Self {
        Self {
            inner: MemoryStore::new(),
            reject,
            error,
        }
    }
}

impl Store for RejectingStore {
    fn find_tech_stack(&self, name: &str) -> StoreResult<Option<TechStack>> {
        self.inner.find_tech_stack(name)
    }

    fn get_tech_stack(&self, id: Uuid) -> StoreResult<Option<TechStack>> {
        self.inner.get_tech_stack(id)
    }

    fn list_tech_stacks(&self) -> StoreResult<Vec<TechStack>> {
        self.inner.list_tech_stacks()
    }

    fn insert_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack> {
        if stack.name == self.reject {
            return Err((self.error)());
        }
        self.inner.insert_tech_stack(stack)
    }

    fn replace_tech_stack(&mut self, stack: TechStack) -> StoreResult<TechStack> {
        self.inner.replace_tech_stack(stack)
    }

    fn delete_tech_stack(&mut self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_tech_stack(id)
    }

    fn get_roadmap(&self, id: Uuid) -> StoreResult<Option<Roadmap>> {
        self.inner.get_roadmap(id)
    }

    fn list_roadmaps(&self) -> StoreResult<Vec<Roadmap>> {
        self.inner.list_roadmaps()
    }

    fn insert_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap> {
        self.inner.insert_roadmap(roadmap)
    }

    fn replace_roadmap(&mut self, roadmap: Roadmap) -> StoreResult<Roadmap> {
        self.inner.replace_roadmap(roadmap)
    }

    fn delete_roadmap(&mut self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_roadmap(id)
    }
}
