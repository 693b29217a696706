use tracing_subscriber::EnvFilter;

use crate::techstack::tools::error::{Result, ToolError};

/// Environment variable holding an `EnvFilter` directive, e.g. `techstack_tools=debug`.
pub const LOG_ENV: &str = "TECHSTACK_LOG";

/// Installs the global subscriber. `TECHSTACK_LOG` takes precedence over the
/// level implied by `verbosity` (0 = info, 1 = debug, 2+ = trace).
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), "info");
        assert_eq!(level_for(1), "debug");
        assert_eq!(level_for(7), "trace");
    }
}
