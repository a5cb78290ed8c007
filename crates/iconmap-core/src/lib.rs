pub mod catalog;
pub mod error;
pub mod inflect;
pub mod naming;
pub mod pipeline;
pub mod rebuild;
pub mod reconcile;
pub mod resolve;
pub mod scan;
pub mod settings;

pub use catalog::{Catalog, Category, LookupEntry, Service};
pub use error::{IconMapError, Result};
pub use inflect::{singularize_identifier, EnglishSingularizer, NoInflection, Singularize};
pub use naming::{category_name, extract_service_name, slugify, NameStyle};
pub use pipeline::{run_sync, run_sync_with, Mode, SyncOptions, SyncOutcome, SyncSummary};
pub use rebuild::rebuild;
pub use reconcile::{reconcile, MergeRules, ReconcileReport, ServiceChange};
pub use resolve::{check_catalog, CheckReport, IconResolver, Resolution};
pub use scan::{scan_tree, Inventory, ScannedDirectory};
pub use settings::Settings;
