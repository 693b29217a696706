//! Core library for the techstack-tools command line application.
//!
//! The library ingests loosely structured curriculum spreadsheets into
//! normalized tech stacks and manages the roadmaps built from them. Tabular
//! adapters live under [`techstack::tools::io`], the header matching and row
//! aggregation in [`techstack::tools::ingest`], persistence behind the
//! [`techstack::tools::store::Store`] trait, and the batch orchestration used
//! by the CLI in [`techstack::tools::pipeline`].

pub mod techstack;

pub use techstack::tools::{
    PersistenceError, Result, ToolError, catalog, config, error, ingest, io, logging, model,
    pipeline, publish, roadmaps, store,
};
