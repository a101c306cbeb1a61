//! Template definition loading and the file-backed template store.
//! Definitions are JSON or YAML files named `<template>.<ext>` in a flat
//! store directory. Loading parses and structurally validates a definition;
//! the store layers name hygiene and a thread-safe cache on top.

use crate::constants::DEFINITION_EXTENSIONS;
use crate::error::{Error, Result};
use crate::validator::{self, Severity};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use walkdir::WalkDir;

/// A parsed template definition.
///
/// Field names follow the definition files' camelCase spelling. Variable
/// declarations keep their file order, which prompting front ends rely on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub supported_project_types: Vec<String>,
    #[serde(default)]
    pub variables: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub files: Vec<TemplateFile>,
}

/// One declared template variable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariableSpec {
    #[serde(rename = "type", default)]
    pub value_type: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: String,
}

/// Declared type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Boolean,
    Number,
}

impl Default for VariableType {
    fn default() -> Self {
        VariableType::String
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::String => write!(f, "string"),
            VariableType::Boolean => write!(f, "boolean"),
            VariableType::Number => write!(f, "number"),
        }
    }
}

/// One file entry of a template definition. Path and content are both
/// templates themselves; the optional condition decides whether the file
/// is generated at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFile {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// Trait for loading template definitions from a backing source.
pub trait TemplateLoader {
    /// Loads and parses the definition registered under `name`.
    fn load(&self, name: &str) -> Result<TemplateMetadata>;

    /// Lists the names available in the backing source.
    fn available(&self) -> Vec<String>;
}

/// Loader for definitions stored as flat files under a root directory.
pub struct FileSystemLoader {
    root: PathBuf,
}

impl FileSystemLoader {
    /// Creates a loader over the given store directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Finds the definition file for `name`, trying extensions in order.
    fn definition_path(&self, name: &str) -> Option<PathBuf> {
        DEFINITION_EXTENSIONS
            .iter()
            .map(|extension| self.root.join(format!("{}.{}", name, extension)))
            .find(|candidate| candidate.is_file())
    }
}

impl TemplateLoader for FileSystemLoader {
    /// Loads a definition from the store directory.
    ///
    /// # Errors
    /// * `Error::TemplateDoesNotExistError` if no definition file matches
    /// * `Error::DefinitionParseError` if the file is not valid JSON or YAML
    fn load(&self, name: &str) -> Result<TemplateMetadata> {
        let Some(path) = self.definition_path(name) else {
            return Err(Error::TemplateDoesNotExistError { name: name.to_string() });
        };
        debug!("Loading template definition from '{}'.", path.display());
        let content = fs::read_to_string(&path)?;
        parse_definition(&path, &content, name)
    }

    /// Lists definition names by scanning the store directory.
    ///
    /// Listing never fails: an unreadable or missing directory produces an
    /// empty list. Names are sorted and deduplicated across extensions.
    fn available(&self) -> Vec<String> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1).into_iter().flatten()
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !DEFINITION_EXTENSIONS.contains(&extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        names
    }
}

fn parse_definition(path: &Path, content: &str, name: &str) -> Result<TemplateMetadata> {
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let parsed: std::result::Result<TemplateMetadata, String> = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };
    parsed.map_err(|detail| Error::DefinitionParseError { name: name.to_string(), detail })
}

/// Thread-safe template store with load-time validation and caching.
///
/// The first successful load of a name parses and validates the definition,
/// then caches it; later loads share the cached `Arc`. Failed loads are not
/// cached, so a fixed definition file is picked up on the next attempt.
pub struct TemplateStore {
    loader: Box<dyn TemplateLoader + Send + Sync>,
    cache: RwLock<HashMap<String, Arc<TemplateMetadata>>>,
}

impl TemplateStore {
    /// Creates a store over any loader implementation.
    pub fn new(loader: Box<dyn TemplateLoader + Send + Sync>) -> Self {
        Self { loader, cache: RwLock::new(HashMap::new()) }
    }

    /// Creates a store over a filesystem directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        Self::new(Box::new(FileSystemLoader::new(root)))
    }

    /// Loads the definition registered under `name`.
    ///
    /// # Errors
    /// * `Error::TemplateDoesNotExistError` for unknown or malformed names
    /// * `Error::DefinitionParseError` if the definition file does not parse
    /// * `Error::InvalidMetadataError` if structural validation reports
    ///   findings of severity ERROR or above
    pub fn load(&self, name: &str) -> Result<Arc<TemplateMetadata>> {
        if !is_valid_name(name) {
            return Err(Error::TemplateDoesNotExistError { name: name.to_string() });
        }
        if let Ok(cache) = self.cache.read() {
            if let Some(metadata) = cache.get(name) {
                return Ok(metadata.clone());
            }
        }

        let metadata = self.loader.load(name)?;
        let mut blocking = Vec::new();
        for finding in validator::validate_metadata(&metadata) {
            if finding.severity >= Severity::Error {
                blocking.push(format!("{}: {}", finding.code, finding.message));
            } else {
                warn!("Template '{}': {}: {}", name, finding.code, finding.message);
            }
        }
        if !blocking.is_empty() {
            return Err(Error::InvalidMetadataError {
                name: name.to_string(),
                detail: blocking.join("; "),
            });
        }

        let metadata = Arc::new(metadata);
        if let Ok(mut cache) = self.cache.write() {
            // Two racing loads keep whichever entry landed first.
            return Ok(cache.entry(name.to_string()).or_insert_with(|| metadata.clone()).clone());
        }
        Ok(metadata)
    }

    /// Lists the names available in the backing source.
    pub fn available(&self) -> Vec<String> {
        self.loader.available()
    }
}

/// Store names are bare identifiers. Path separators and parent-directory
/// components would escape the store root, so such names simply do not
/// exist as far as the store is concerned.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}
