use std::fs;
use std::path::Path;

#[cfg(feature = "yaml-definitions")]
use serde_yaml;
#[cfg(feature = "toml-definitions")]
use toml;

use crate::definition::ComponentDefinition;
use crate::definition::error::DefinitionError;

/// Serialization a component definition file is written in.
///
/// YAML and TOML are only available with the `yaml-definitions` and
/// `toml-definitions` features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefinitionFormat {
    Json,
    #[cfg(feature = "yaml-definitions")]
    Yaml,
    #[cfg(feature = "toml-definitions")]
    Toml,
}

impl DefinitionFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DefinitionFormat::Json => "json",
            #[cfg(feature = "yaml-definitions")]
            DefinitionFormat::Yaml => "yaml",
            #[cfg(feature = "toml-definitions")]
            DefinitionFormat::Toml => "toml",
        }
    }

    /// Pick the format for a definition file by its extension, ignoring case.
    ///
    /// `None` for unknown extensions and for formats whose feature is off.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(DefinitionFormat::Json),
            #[cfg(feature = "yaml-definitions")]
            "yaml" | "yml" => Some(DefinitionFormat::Yaml),
            #[cfg(feature = "toml-definitions")]
            "toml" => Some(DefinitionFormat::Toml),
            _ => None,
        }
    }

    /// Parse a definition from text in this format
    pub fn parse(&self, data: &str) -> Result<ComponentDefinition, DefinitionError> {
        match self {
            DefinitionFormat::Json => serde_json::from_str(data).map_err(|e| DefinitionError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
            #[cfg(feature = "yaml-definitions")]
            DefinitionFormat::Yaml => serde_yaml::from_str(data).map_err(|e| DefinitionError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            #[cfg(feature = "toml-definitions")]
            DefinitionFormat::Toml => toml::from_str(data).map_err(|e| DefinitionError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
        }
    }
}

/// Read and parse the definition at `path`, choosing the format by extension.
pub fn load_definition(path: &Path) -> Result<ComponentDefinition, DefinitionError> {
    let format = DefinitionFormat::from_path(path).ok_or_else(|| DefinitionError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let data = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loading {} definition from {}", format.extension(), path.display());
    format.parse(&data)
}
