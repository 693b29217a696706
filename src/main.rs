use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use techstack_tools::catalog::{self, ItemPatch, NewItem};
use techstack_tools::config::{DEFAULT_PUBLISH_DIR, DEFAULT_STORE_PATH, Settings};
use techstack_tools::ingest::{TopicMatch, normalize_status};
use techstack_tools::io::excel_write;
use techstack_tools::model::RoleTrack;
use techstack_tools::pipeline::{self, RunSummary};
use techstack_tools::roadmaps::{self, RoadmapDraft, RoadmapUpdate};
use techstack_tools::{Result, ToolError, logging, publish};
use uuid::Uuid;

/// Exit code used when a batch finished but some units failed.
const PARTIAL_FAILURE_EXIT: i32 = 2;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = logging::init_logging(cli.global.verbose) {
        eprintln!("warning: {error}");
    }
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(PARTIAL_FAILURE_EXIT),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a batch command recorded failed units.
fn run(cli: Cli) -> Result<bool> {
    let settings = cli.global.settings();
    match cli.command {
        Command::Import(args) => {
            let mut store = settings.open_store()?;
            let topic_match = args.topic_match.resolve(TopicMatch::Strict);
            report(pipeline::import_workbook(&mut store, &args.file, topic_match)?)
        }
        Command::Convert(args) => {
            let topic_match = args.topic_match.resolve(TopicMatch::Strict);
            report(pipeline::convert_workbook(&args.file, &args.out, topic_match)?)
        }
        Command::Upload(args) => {
            let mut store = settings.open_store()?;
            let topic_match = args.topic_match.resolve(TopicMatch::Loose);
            let summary = match (&args.file, &args.dir) {
                (Some(file), _) => {
                    let name = args.name.as_deref().unwrap_or_default();
                    pipeline::upload_csv(&mut store, file, name, args.description, topic_match)?
                }
                (None, Some(dir)) => pipeline::upload_csv_dir(&mut store, dir, topic_match)?,
                (None, None) => return Err(ToolError::EmptyField("--file or --dir")),
            };
            report(summary)
        }
        Command::Export(args) => {
            let store = settings.open_store()?;
            let stacks = if args.names.is_empty() {
                catalog::list_tech_stacks(&store)?
            } else {
                args.names
                    .iter()
                    .map(|name| catalog::get_tech_stack(&store, name))
                    .collect::<Result<Vec<_>>>()?
            };
            excel_write::write_tech_stacks(&args.out, &stacks)?;
            println!("exported {} tech stack(s) to {}", stacks.len(), args.out.display());
            Ok(true)
        }
        Command::Stack(command) => run_stack(&settings, command).map(|()| true),
        Command::Roadmap(command) => run_roadmap(&settings, command).map(|()| true),
    }
}

fn run_stack(settings: &Settings, command: StackCommand) -> Result<()> {
    let mut store = settings.open_store()?;
    match command {
        StackCommand::List => {
            for stack in catalog::list_tech_stacks(&store)? {
                println!("{}\t{} topic(s)", stack.name, stack.roadmap_items.len());
            }
            Ok(())
        }
        StackCommand::Show { name } => print_json(&catalog::get_tech_stack(&store, &name)?),
        StackCommand::Delete { name } => catalog::delete_tech_stack(&mut store, &name),
        StackCommand::AddItem(args) => {
            let item = NewItem {
                topic: args.topic,
                sub_topics: args.sub_topics,
                projects: args.projects,
                status: args.status.map(|raw| normalize_status(&raw)).unwrap_or_default(),
            };
            print_json(&catalog::add_roadmap_item(&mut store, &args.stack, item)?)
        }
        StackCommand::UpdateItem(args) => {
            let patch = ItemPatch {
                topic: args.topic,
                sub_topics: (!args.sub_topics.is_empty()).then_some(args.sub_topics),
                projects: (!args.projects.is_empty()).then_some(args.projects),
                status: args.status.map(|raw| normalize_status(&raw)),
            };
            print_json(&catalog::update_roadmap_item(&mut store, &args.stack, args.id, patch)?)
        }
        StackCommand::DeleteItem { stack, id } => catalog::delete_roadmap_item(&mut store, &stack, id),
    }
}

fn run_roadmap(settings: &Settings, command: RoadmapCommand) -> Result<()> {
    let mut store = settings.open_store()?;
    match command {
        RoadmapCommand::Create(args) => {
            let draft = RoadmapDraft {
                company: args.company,
                role: args.role,
                tech_stacks: args.stacks,
                roles: parse_tracks(&args.tracks)?,
            };
            print_json(&roadmaps::create_roadmap(&mut store, draft)?)
        }
        RoadmapCommand::List => {
            for roadmap in roadmaps::list_roadmaps(&store)? {
                println!("{}\t{}\t{}", roadmap.id, roadmap.company, roadmap.role);
            }
            Ok(())
        }
        RoadmapCommand::Show { id } => print_json(&roadmaps::get_roadmap(&store, id)?),
        RoadmapCommand::Find { company, role } => {
            print_json(&roadmaps::find_roadmaps(&store, &company, role.as_deref())?)
        }
        RoadmapCommand::Update(args) => {
            let update = RoadmapUpdate {
                tech_stacks: (!args.stacks.is_empty()).then_some(args.stacks),
                roles: if args.tracks.is_empty() {
                    None
                } else {
                    Some(parse_tracks(&args.tracks)?)
                },
            };
            print_json(&roadmaps::update_roadmap(&mut store, args.id, update)?)
        }
        RoadmapCommand::Delete { id } => roadmaps::delete_roadmap(&mut store, id),
        RoadmapCommand::Publish { id, file } => {
            if !file.is_file() {
                return Err(ToolError::SourceNotFound(file));
            }
            let rendered = std::fs::read(&file)?;
            let mut blobs = settings.blob_store();
            let roadmap = publish::publish_roadmap(&mut store, &mut blobs, id, &rendered)?;
            println!("{}", roadmap.url.unwrap_or_default());
            Ok(())
        }
    }
}

/// Parses `role=StackA,StackB` role track arguments.
fn parse_tracks(raw: &[String]) -> Result<Vec<RoleTrack>> {
    raw.iter()
        .map(|track| {
            let (role, stacks) = track.split_once('=').unwrap_or((track.as_str(), ""));
            let role = role.trim();
            if role.is_empty() {
                return Err(ToolError::EmptyField("role"));
            }
            Ok(RoleTrack {
                role: role.to_string(),
                tech_stacks: stacks
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

fn report(summary: RunSummary) -> Result<bool> {
    for (unit, reason) in &summary.skipped {
        println!("skipped {unit}: {reason}");
    }
    for (unit, error) in &summary.failed {
        println!("failed {unit}: {error}");
    }
    println!("{summary}");
    Ok(summary.is_clean())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Ingest curriculum spreadsheets into tech stacks and manage roadmaps."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON document backing the tech stack and roadmap collections.
    #[arg(long, global = true, env = "TECHSTACK_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Directory published roadmaps are written to.
    #[arg(long, global = true, env = "TECHSTACK_PUBLISH_DIR", default_value = DEFAULT_PUBLISH_DIR)]
    publish_dir: PathBuf,

    /// Base URL the publish directory is served from.
    #[arg(long, global = true, env = "TECHSTACK_PUBLIC_URL")]
    public_url: Option<String>,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl GlobalArgs {
    fn settings(&self) -> Settings {
        Settings::new(
            self.store.clone(),
            self.publish_dir.clone(),
            self.public_url.clone(),
        )
    }
}

#[derive(Subcommand)]
enum Command {
    /// Import every sheet of a workbook as a tech stack.
    Import(ImportArgs),
    /// Convert every sheet of a workbook into a normalized CSV file.
    Convert(ConvertArgs),
    /// Upload a CSV file, or a directory of CSV files, as tech stacks.
    Upload(UploadArgs),
    /// Export stored tech stacks to an xlsx workbook.
    Export(ExportArgs),
    /// Inspect and edit stored tech stacks.
    #[command(subcommand)]
    Stack(StackCommand),
    /// Manage roadmaps.
    #[command(subcommand)]
    Roadmap(RoadmapCommand),
}

#[derive(Args)]
struct TopicMatchArg {
    /// Whether a header containing "sub" may be taken as the topic column.
    #[arg(long, value_enum)]
    topic_match: Option<TopicMatchKind>,
}

impl TopicMatchArg {
    fn resolve(&self, default: TopicMatch) -> TopicMatch {
        self.topic_match.map(TopicMatch::from).unwrap_or(default)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TopicMatchKind {
    Strict,
    Loose,
}

impl From<TopicMatchKind> for TopicMatch {
    fn from(kind: TopicMatchKind) -> Self {
        match kind {
            TopicMatchKind::Strict => TopicMatch::Strict,
            TopicMatchKind::Loose => TopicMatch::Loose,
        }
    }
}

#[derive(Args)]
struct ImportArgs {
    /// Workbook to import.
    #[arg(long)]
    file: PathBuf,

    #[command(flatten)]
    topic_match: TopicMatchArg,
}

#[derive(Args)]
struct ConvertArgs {
    /// Workbook to convert.
    #[arg(long)]
    file: PathBuf,

    /// Directory receiving one CSV file per sheet.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    topic_match: TopicMatchArg,
}

#[derive(Args)]
struct UploadArgs {
    /// Single CSV file to upload.
    #[arg(long, conflicts_with = "dir", requires = "name")]
    file: Option<PathBuf>,

    /// Tech stack name for a single-file upload.
    #[arg(long)]
    name: Option<String>,

    /// Description stored with a single-file upload.
    #[arg(long, requires = "file")]
    description: Option<String>,

    /// Directory of CSV files; each file stem becomes a tech stack name.
    #[arg(long)]
    dir: Option<PathBuf>,

    #[command(flatten)]
    topic_match: TopicMatchArg,
}

#[derive(Args)]
struct ExportArgs {
    /// Workbook to write.
    #[arg(long)]
    out: PathBuf,

    /// Tech stacks to export; all when omitted.
    #[arg(long = "name")]
    names: Vec<String>,
}

#[derive(Subcommand)]
enum StackCommand {
    /// List stored tech stacks.
    List,
    /// Print a tech stack as JSON.
    Show { name: String },
    /// Delete a tech stack.
    Delete { name: String },
    /// Add a roadmap item to a tech stack.
    AddItem(AddItemArgs),
    /// Update a roadmap item by id.
    UpdateItem(UpdateItemArgs),
    /// Delete a roadmap item by id.
    DeleteItem { stack: String, id: Uuid },
}

#[derive(Args)]
struct AddItemArgs {
    stack: String,
    topic: String,

    #[arg(long = "sub-topic")]
    sub_topics: Vec<String>,

    #[arg(long = "project")]
    projects: Vec<String>,

    /// Free-text status, normalized like spreadsheet input.
    #[arg(long)]
    status: Option<String>,
}

#[derive(Args)]
struct UpdateItemArgs {
    stack: String,
    id: Uuid,

    #[arg(long)]
    topic: Option<String>,

    /// Replaces all sub-topics when given.
    #[arg(long = "sub-topic")]
    sub_topics: Vec<String>,

    /// Replaces all projects when given.
    #[arg(long = "project")]
    projects: Vec<String>,

    #[arg(long)]
    status: Option<String>,
}

#[derive(Subcommand)]
enum RoadmapCommand {
    /// Create a roadmap.
    Create(CreateRoadmapArgs),
    /// List roadmaps.
    List,
    /// Print a roadmap as JSON.
    Show { id: Uuid },
    /// Find roadmaps by company and, optionally, role.
    Find {
        company: String,
        #[arg(long)]
        role: Option<String>,
    },
    /// Replace the tech stacks or role tracks of a roadmap.
    Update(UpdateRoadmapArgs),
    /// Delete a roadmap.
    Delete { id: Uuid },
    /// Upload a rendered roadmap and record its public URL.
    Publish {
        id: Uuid,
        /// Pre-rendered roadmap document.
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Args)]
struct CreateRoadmapArgs {
    company: String,
    role: String,

    /// Tech stack followed by the primary role (repeatable).
    #[arg(long = "stack")]
    stacks: Vec<String>,

    /// Extra role track for a consolidated roadmap, as `role=StackA,StackB`.
    #[arg(long = "track")]
    tracks: Vec<String>,
}

#[derive(Args)]
struct UpdateRoadmapArgs {
    id: Uuid,

    #[arg(long = "stack")]
    stacks: Vec<String>,

    #[arg(long = "track")]
    tracks: Vec<String>,
}
