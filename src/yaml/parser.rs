//! YAML and JSON parsing with error handling

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into a typed value with nice error messages
pub fn parse_yaml<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Parse JSON content into a typed value with nice error messages
pub fn parse_json<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_json::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_json_error(&e, content, filename))
    })
}

/// Parse a file, choosing JSON for `.json` and YAML otherwise
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
        parse_json(&content, &filename)
    } else {
        parse_yaml(&content, &filename)
    }
}
