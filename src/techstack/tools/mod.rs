pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod roadmaps;
pub mod store;

pub use error::{PersistenceError, Result, ToolError};
