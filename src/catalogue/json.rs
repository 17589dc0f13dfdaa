use super::{CatalogueData, CatalogueSnapshot};
use crate::error::{GeneratorError, Result};
use crate::scheduler::GeneratorConfig;
use std::fs;
use std::path::Path;

/// Load a complete catalogue from a directory of JSON files.
///
/// `courses.json`, `lecturers.json`, `rooms.json`, `groups.json`,
/// `lecturer_assignments.json` and `group_assignments.json` are required;
/// `departments.json` and `unavailability.json` default to empty.
pub fn load_catalogue_from_dir(dir: &Path) -> Result<CatalogueSnapshot> {
    let data = CatalogueData {
        departments: load_json_or_default(&dir.join("departments.json"))?,
        courses: load_json_file(&dir.join("courses.json"))?,
        lecturers: load_json_file(&dir.join("lecturers.json"))?,
        rooms: load_json_file(&dir.join("rooms.json"))?,
        groups: load_json_file(&dir.join("groups.json"))?,
        lecturer_assignments: load_json_file(&dir.join("lecturer_assignments.json"))?,
        group_assignments: load_json_file(&dir.join("group_assignments.json"))?,
        unavailability: load_json_or_default(&dir.join("unavailability.json"))?,
    };

    Ok(CatalogueSnapshot::from_data(data))
}

/// Load generator config from a TOML file, or use defaults.
///
/// A missing or unparseable file falls back to the defaults; a config
/// that parses but describes an unrepresentable time grid is an error.
pub fn load_config_or_default(path: &Path) -> Result<GeneratorConfig> {
    let config = if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => GeneratorConfig::default(),
        }
    } else {
        GeneratorConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Generic JSON file loader
fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| GeneratorError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| {
        GeneratorError::JsonParse {
            file: path_str,
            message: e.to_string(),
        }
        .into()
    })
}

/// Like [`load_json_file`], but a missing file yields `T::default()`
fn load_json_or_default<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if path.exists() {
        load_json_file(path)
    } else {
        Ok(T::default())
    }
}
