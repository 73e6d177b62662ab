//! Reading and writing dataset files. `.yaml`/`.yml` are YAML, anything else JSON.

use crate::error::VsmError;
use std::{fs, path::Path};
use tracing::info;
use valuestream_schemas::file_formats::DatasetFile;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("yaml") | Some("yml")
    )
}

/// Loads a [`DatasetFile`]. A bare dataset (no `dataset` wrapper) is accepted too.
pub fn load_dataset_file<P: AsRef<Path>>(path: P) -> Result<DatasetFile, VsmError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| VsmError::FileIO(path_str.clone(), e))?;

    let file = if is_yaml(path) {
        let value: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| VsmError::YamlParsing(path_str.clone(), e))?;
        let parsed = if value.get("dataset").is_some() {
            serde_yaml::from_value(value)
        } else {
            serde_yaml::from_value(value).map(DatasetFile::new)
        };
        parsed.map_err(|e| VsmError::YamlParsing(path_str.clone(), e))?
    } else {
        let value: serde_json::Value = serde_json::from_str(&content)?;
        if value.get("dataset").is_some() {
            serde_json::from_value(value)?
        } else {
            DatasetFile::new(serde_json::from_value(value)?)
        }
    };

    info!(
        path = %path_str,
        processes = file.dataset.processes.len(),
        "loaded dataset"
    );
    Ok(file)
}

pub fn save_dataset_file<P: AsRef<Path>>(path: P, file: &DatasetFile) -> Result<(), VsmError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let content = if is_yaml(path) {
        serde_yaml::to_string(file).map_err(|e| VsmError::YamlParsing(path_str.clone(), e))?
    } else {
        serde_json::to_string_pretty(file)?
    };
    fs::write(path, content).map_err(|e| VsmError::FileIO(path_str, e))
}
