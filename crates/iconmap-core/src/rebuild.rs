//! Rebuild mode: derive a fresh catalog from the icon tree alone.

use crate::catalog::{Catalog, Category, Service};
use crate::inflect::{singularize_identifier, Singularize};
use crate::naming::{category_name, extract_service_name, NameStyle};
use crate::scan::ScannedDirectory;

/// Build the service entry for one icon file
pub fn service_from_file(file_name: &str, inflector: &dyn Singularize) -> Service {
    let source = extract_service_name(file_name, NameStyle::Rebuild);
    let target = singularize_identifier(&source.replace(' ', ""), inflector);
    Service::new(source, target)
}

/// One category per directory, one service per SVG file, in listing order
pub fn rebuild(tree: &[ScannedDirectory], inflector: &dyn Singularize) -> Catalog {
    let categories = tree
        .iter()
        .map(|dir| {
            let mut category = Category::new(category_name(&dir.name, NameStyle::Rebuild));
            for file in &dir.files {
                let service = service_from_file(file, inflector);
                // `Blob.svg` and `Blob_COLOR.svg` name the same service
                if !category.contains(&service.source) {
                    category.services.push(service);
                }
            }
            tracing::debug!(
                "Built category {} with {} services",
                category.name,
                category.services.len()
            );
            category
        })
        .collect();

    Catalog { categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflect::{EnglishSingularizer, NoInflection};
    use std::path::PathBuf;

    fn dir(name: &str, files: &[&str]) -> ScannedDirectory {
        ScannedDirectory {
            name: name.to_string(),
            path: PathBuf::from(name),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn builds_compute_virtual_machine() {
        let tree = vec![dir("compute", &["10001-icon-service-Virtual-Machine.svg"])];
        let catalog = rebuild(&tree, &EnglishSingularizer);

        assert_eq!(catalog.categories.len(), 1);
        let compute = &catalog.categories[0];
        assert_eq!(compute.name, "Compute");
        assert_eq!(
            compute.services,
            vec![Service::new("Virtual Machine", "VirtualMachine")]
        );
    }

    #[test]
    fn targets_are_singularized() {
        let service = service_from_file("10021-icon-service-Key-Vaults.svg", &EnglishSingularizer);
        assert_eq!(service.source, "Key Vaults");
        assert_eq!(service.target, "KeyVault");

        let service = service_from_file("10021-icon-service-Key-Vaults.svg", &NoInflection);
        assert_eq!(service.target, "KeyVaults");
    }

    #[test]
    fn empty_directory_yields_empty_category() {
        let tree = vec![dir("ai-machine-learning", &[]), dir("storage", &["Blob_COLOR.svg"])];
        let catalog = rebuild(&tree, &EnglishSingularizer);

        assert_eq!(catalog.categories[0].name, "AiMachineLearning");
        assert!(catalog.categories[0].services.is_empty());
        assert_eq!(catalog.categories[1].services[0].target, "Blob");
    }

    #[test]
    fn color_and_plain_variants_collapse() {
        let tree = vec![dir("storage", &["Blob.svg", "Blob_COLOR.svg", "Blob(m).svg"])];
        let catalog = rebuild(&tree, &EnglishSingularizer);
        assert_eq!(catalog.categories[0].services.len(), 1);
    }
}
