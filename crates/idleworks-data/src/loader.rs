//! Format detection and deserialization for scenario files.
//!
//! Supports RON, JSON and TOML, chosen by file extension.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use idleworks_core::registry::RegistryError;

use crate::schema::ScenarioData;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading or resolving a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A command names a material the scenario does not define.
    #[error("unknown material '{name}'")]
    UnknownMaterial { name: String },

    /// A material quantity is NaN, infinite, or outside the fixed-point range.
    #[error("material '{name}': {field} {value} is not representable")]
    OutOfRange {
        name: String,
        field: &'static str,
        value: f64,
    },

    /// An upgrade command targets a material with no factory built yet.
    #[error("no '{material}' factory to upgrade")]
    NoFactory { material: String },

    /// The material list failed registry validation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ScenarioError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ScenarioError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `origin` only labels errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    origin: &Path,
) -> Result<T, ScenarioError> {
    let parse_err = |detail: String| ScenarioError::Parse {
        file: origin.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, ScenarioError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Parse scenario text that did not come from a file.
pub fn parse_scenario(text: &str, format: Format) -> Result<ScenarioData, ScenarioError> {
    deserialize_str(text, format, Path::new("<inline>"))
}

/// Load a scenario file.
pub fn load_scenario(path: &Path) -> Result<ScenarioData, ScenarioError> {
    let data: ScenarioData = deserialize_file(path)?;
    debug!(
        path = %path.display(),
        materials = data.materials.len(),
        opening = data.opening.len(),
        "scenario loaded"
    );
    Ok(data)
}
