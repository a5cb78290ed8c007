//! Icon catalog document (`Config.yaml`).
//!
//! The catalog groups services into categories:
//!
//! ```yaml
//! Categories:
//! - Name: Compute
//!   Services:
//!   - Source: Virtual-Machine
//!     Target: AzureVirtual-Machine
//! ```
//!
//! Field order (`Name`/`Services`, `Source`/`Target`) follows struct order and
//! is never sorted on output.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{IconMapError, Result};

/// One icon's name pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    /// Service name as extracted from the icon file name
    pub source: String,
    /// Identifier emitted for the service
    pub target: String,
    /// Whether the generated sprite should fit to canvas (hand-curated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<bool>,
}

impl Service {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            fit: None,
        }
    }
}

/// Named group of services, derived from an icon directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub services: Vec<Service>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            services: Vec::new(),
        }
    }

    /// Check whether a service with this `Source` is already listed
    pub fn contains(&self, source: &str) -> bool {
        self.services.iter().any(|s| s.source == source)
    }
}

/// Top-level persisted document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Category>,
}

/// Flattened `(category, service)` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    pub category: String,
    pub source: String,
    pub target: String,
    pub fit_to_canvas: bool,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Catalog {
    /// Load the catalog from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IconMapError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| IconMapError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse a catalog from YAML text. An empty document is an empty catalog.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Serialize the catalog to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Save the catalog, replacing the file's previous content
    ///
    /// The document is fully serialized before the file is touched.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_yaml()?;
        Self::save_yaml(path, &content)
    }

    /// Write already serialized catalog text to `path`
    pub fn save_yaml(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| IconMapError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, content).map_err(|source| IconMapError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of services across all categories
    pub fn service_count(&self) -> usize {
        self.categories.iter().map(|c| c.services.len()).sum()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Flatten into lookup rows, in document order
    pub fn lookup(&self) -> Vec<LookupEntry> {
        self.categories
            .iter()
            .flat_map(|cat| {
                cat.services.iter().map(move |service| LookupEntry {
                    category: cat.name.clone(),
                    source: service.source.clone(),
                    target: service.target.clone(),
                    fit_to_canvas: service.fit.unwrap_or(false),
                })
            })
            .collect()
    }
}
