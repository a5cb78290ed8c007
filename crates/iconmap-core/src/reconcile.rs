//! Merge mode: bring an existing catalog in line with the icon tree.
//!
//! Existing categories keep their order and hand-curated entries. Services
//! whose icon disappeared are dropped, newly discovered services are appended,
//! and directories without a matching category get a new category at the end.

use std::collections::{BTreeSet, HashSet};

use crate::catalog::{Catalog, Category, Service};
use crate::naming::{category_name, slugify, NameStyle};
use crate::scan::Inventory;

pub const DEFAULT_TARGET_PREFIX: &str = "Azure";

/// How discovered services are distributed over categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRules {
    /// Prepended to the space-stripped source to form the target
    pub target_prefix: String,
    /// When set, a category only receives services found in the directory
    /// whose slug matches its own. Otherwise every discovered service is
    /// mirrored into every category.
    pub scoped: bool,
}

impl Default for MergeRules {
    fn default() -> Self {
        Self {
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
            scoped: false,
        }
    }
}

impl MergeRules {
    pub fn target_for(&self, source: &str) -> String {
        format!("{}{}", self.target_prefix, source.replace(' ', ""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceChange {
    pub category: String,
    pub source: String,
}

/// What a merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: Vec<ServiceChange>,
    pub added: Vec<ServiceChange>,
    pub created_categories: Vec<String>,
}

impl ReconcileReport {
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.created_categories.is_empty()
    }
}

/// Services a category with this slug should hold
fn candidates<'a>(
    inventory: &'a Inventory,
    rules: &MergeRules,
    slug: &str,
) -> BTreeSet<&'a String> {
    if !rules.scoped {
        return inventory.services.iter().collect();
    }

    inventory
        .by_directory
        .iter()
        .filter(|(dir, _)| slugify(dir) == slug)
        .flat_map(|(_, services)| services.iter())
        .collect()
}

/// Update `catalog` in place against the discovered inventory
pub fn reconcile(catalog: &mut Catalog, inventory: &Inventory, rules: &MergeRules) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    let mut known_slugs: HashSet<String> =
        catalog.categories.iter().map(|c| slugify(&c.name)).collect();

    for category in &mut catalog.categories {
        tracing::debug!("Processing category: {}", category.name);

        let name = category.name.clone();
        category.services.retain(|service| {
            let keep = inventory.services.contains(&service.source);
            if !keep {
                tracing::debug!("  Removing service: {} from category {}", service.source, name);
                report.removed.push(ServiceChange {
                    category: name.clone(),
                    source: service.source.clone(),
                });
            }
            keep
        });

        for source in candidates(inventory, rules, &slugify(&name)) {
            if category.contains(source) {
                continue;
            }
            tracing::debug!("  Adding service: {} to category {}", source, name);
            category
                .services
                .push(Service::new(source.clone(), rules.target_for(source)));
            report.added.push(ServiceChange {
                category: name.clone(),
                source: source.clone(),
            });
        }
    }

    for directory in &inventory.directories {
        let slug = slugify(directory);
        if known_slugs.contains(&slug) {
            continue;
        }

        let mut category = Category::new(category_name(directory, NameStyle::Merge));
        tracing::info!("Creating new category {} for directory {}", category.name, directory);

        for source in candidates(inventory, rules, &slug) {
            tracing::debug!("  Adding service: {} to category {}", source, category.name);
            category
                .services
                .push(Service::new(source.clone(), rules.target_for(source)));
            report.added.push(ServiceChange {
                category: category.name.clone(),
                source: source.clone(),
            });
        }

        report.created_categories.push(category.name.clone());
        catalog.categories.push(category);
        known_slugs.insert(slug);
    }

    report
}
