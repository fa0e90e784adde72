//! hn-project: network file format, validation and conversion.
//!
//! Files are YAML or JSON, chosen by extension (`.json` is JSON, anything
//! else YAML).

pub mod convert;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use convert::{catalog_from_file, fluid_from_file, results_from_network, sizing_params, to_network};
pub use schema::*;
pub use validate::{ValidationError, validate_file};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] hn_catalog::CatalogError),

    #[error("Network error: {0}")]
    Network(#[from] hn_network::NetworkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_yaml(path: &Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let file: NetworkFile = serde_yaml::from_str(&content)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &Path, file: &NetworkFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let file: NetworkFile = serde_json::from_str(&content)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &Path, file: &NetworkFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load and validate a network file, YAML or JSON by extension.
pub fn load_file(path: &Path) -> ProjectResult<NetworkFile> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

/// Validate and write a network file, YAML or JSON by extension.
pub fn save_file(path: &Path, file: &NetworkFile) -> ProjectResult<()> {
    if is_json(path) {
        save_json(path, file)
    } else {
        save_yaml(path, file)
    }
}

/// Write computed results, YAML or JSON by extension.
pub fn save_results(path: &Path, results: &NetworkResults) -> ProjectResult<()> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(results)?
    } else {
        serde_yaml::to_string(results)?
    };
    std::fs::write(path, content)?;
    Ok(())
}
