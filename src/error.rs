// Error types, split by when they happen.
// - `ConfigError` is raised while loading the catalog and is meant to reach
//   the caller untouched.
// - `ActivityError` is raised while rendering a page; the menu catches it and
//   shows it in the UI so the control stays usable.

use std::path::PathBuf;
use thiserror::Error;

/// Load-time failures of the Activity Loader.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no such file or directory: '{}'", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error loading YAML from `{url}`: {message}")]
    Fetch { url: String, message: String },

    #[error("file `{source_name}` loading error: {source}")]
    ConfigParseError {
        source_name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid activities file `{source_name}`: {message}")]
    ConfigSchemaError { source_name: String, message: String },

    #[error("duplicate activity name `{name}` (records {first} and {second})")]
    DuplicateActivity {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Render-time failures of the Menu Builder.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("no such directory: '{}'", .0.display())]
    NotADirectory(PathBuf),

    #[error("no such file: '{}'", .0.display())]
    ActivityNotFound(PathBuf),

    #[error("failed to read page `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("activity `{name}` failed: {source:#}")]
    ActivityExecutionError {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
