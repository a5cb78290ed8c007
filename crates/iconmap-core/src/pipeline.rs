//! One-shot sync run: load, scan, transform, write.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{IconMapError, Result};
use crate::inflect::{EnglishSingularizer, Singularize};
use crate::rebuild::rebuild;
use crate::reconcile::{reconcile, MergeRules, ReconcileReport};
use crate::scan::{require_root, scan_tree, Inventory};

/// How the catalog is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Reconcile the existing catalog with the icon trees
    #[default]
    Merge,
    /// Discard the existing catalog and derive a new one from the official tree
    Rebuild,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Merge => write!(f, "merge"),
            Mode::Rebuild => write!(f, "rebuild"),
        }
    }
}

impl FromStr for Mode {
    type Err = IconMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(Mode::Merge),
            "rebuild" => Ok(Mode::Rebuild),
            _ => Err(IconMapError::InvalidSettingsValue {
                key: "sync.mode".to_string(),
                value: s.to_string(),
                reason: "expected 'merge' or 'rebuild'".to_string(),
            }),
        }
    }
}

/// Fully resolved inputs for one run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub mode: Mode,
    pub official: PathBuf,
    /// Extra icon root, scanned in merge mode only
    pub manual: Option<PathBuf>,
    pub catalog: PathBuf,
    pub rules: MergeRules,
    /// Produce the document without writing it
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSummary {
    Merged(ReconcileReport),
    Rebuilt { categories: usize, services: usize },
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub catalog: Catalog,
    /// Serialized document, identical to what was (or would be) written
    pub yaml: String,
    pub summary: SyncSummary,
    pub written: bool,
}

/// Run with the default English singularizer
pub fn run_sync(options: &SyncOptions) -> Result<SyncOutcome> {
    run_sync_with(options, &EnglishSingularizer)
}

/// Run the configured mode. Nothing is written unless every step succeeds.
pub fn run_sync_with(options: &SyncOptions, inflector: &dyn Singularize) -> Result<SyncOutcome> {
    tracing::info!(
        "Syncing {} ({} mode)",
        options.catalog.display(),
        options.mode
    );

    let (catalog, summary) = match options.mode {
        Mode::Merge => {
            let mut catalog = Catalog::load(&options.catalog)?;

            let mut roots = vec![options.official.clone()];
            roots.extend(options.manual.clone());
            for root in &roots {
                require_root(root)?;
            }

            let inventory = Inventory::scan(&roots)?;
            let report = reconcile(&mut catalog, &inventory, &options.rules);
            tracing::info!(
                "Merged: {} removed, {} added, {} new categories",
                report.removed.len(),
                report.added.len(),
                report.created_categories.len()
            );
            (catalog, SyncSummary::Merged(report))
        }
        Mode::Rebuild => {
            let tree = scan_tree(&options.official)?;
            let catalog = rebuild(&tree, inflector);
            let summary = SyncSummary::Rebuilt {
                categories: catalog.categories.len(),
                services: catalog.service_count(),
            };
            tracing::info!(
                "Rebuilt: {} categories, {} services",
                catalog.categories.len(),
                catalog.service_count()
            );
            (catalog, summary)
        }
    };

    let yaml = catalog.to_yaml()?;

    let written = if options.dry_run {
        tracing::info!("Dry run: {} left untouched", options.catalog.display());
        false
    } else {
        Catalog::save_yaml(&options.catalog, &yaml)?;
        true
    };

    Ok(SyncOutcome {
        catalog,
        yaml,
        summary,
        written,
    })
}
