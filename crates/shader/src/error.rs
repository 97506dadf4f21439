use std::path::PathBuf;

use crate::source::StageKind;

/// Errors from building a shader program.
///
/// Every variant is fatal to the build that produced it. The only soft
/// failure in the pipeline, an unknown uniform name, never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read included shader {} (included from {})", .path.display(), .included_from.display())]
    IncludeRead {
        path: PathBuf,
        included_from: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("include cycle: {} includes itself", .path.display())]
    IncludeCycle { path: PathBuf },
    #[error("unknown shader stage `{name}` at {}:{line}", .path.display())]
    UnknownStage {
        name: String,
        path: PathBuf,
        line: usize,
    },
    #[error("#type directive inside included file {}:{line}", .path.display())]
    TypeInInclude { path: PathBuf, line: usize },
    #[error("no shader stages found")]
    NoStages,
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: StageKind, log: String },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
    #[error("graphics backend error: {0}")]
    Backend(String),
}

/// Errors from loading a [`ShaderConfig`](crate::ShaderConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
