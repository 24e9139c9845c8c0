use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a component definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read definition file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported definition format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse {format} definition: {message}")]
    Parse { format: &'static str, message: String },

    #[error("Unknown lifecycle hook '{name}'")]
    UnknownHook { name: String },
}
