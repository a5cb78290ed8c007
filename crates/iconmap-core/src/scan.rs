//! Icon tree scanning.
//!
//! Only file and directory names are read; file contents are never opened.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{IconMapError, Result};
use crate::naming::{extract_service_name, is_svg, NameStyle};

/// Fail with `PathNotFound` unless `path` is an existing directory
pub fn require_root(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(IconMapError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Everything discovered below one or more icon roots, pooled across roots
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    /// Service names from every SVG file at any depth
    pub services: BTreeSet<String>,
    /// Lower-cased names of every directory at any depth
    pub directories: BTreeSet<String>,
    /// Services keyed by the lower-cased name of their containing directory
    pub by_directory: BTreeMap<String, BTreeSet<String>>,
}

/// Attach the failing path, or the directory being walked, to a walk error
pub(crate) fn walk_error(dir: &Path, err: walkdir::Error) -> IconMapError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    IconMapError::Scan { path, source: err }
}

impl Inventory {
    /// Walk each root recursively and pool what is found
    ///
    /// Roots must exist; see [`require_root`]. Symlinks are classified by
    /// their target but symlinked directories are not descended into. Any
    /// unreadable entry fails the whole scan.
    pub fn scan<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        let mut inventory = Self::default();

        for root in roots {
            let root: &Path = root.as_ref();
            for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| walk_error(root, e))?;
                let path = entry.path();
                let name = entry.file_name().to_string_lossy();

                if path.is_dir() {
                    inventory.directories.insert(name.to_lowercase());
                    continue;
                }

                if !path.is_file() || !is_svg(path) {
                    continue;
                }

                let service = extract_service_name(&name, NameStyle::Merge);
                if let Some(dir) = path
                    .parent()
                    .filter(|p| *p != root)
                    .and_then(|p| p.file_name())
                {
                    inventory
                        .by_directory
                        .entry(dir.to_string_lossy().to_lowercase())
                        .or_default()
                        .insert(service.clone());
                }
                inventory.services.insert(service);
            }
        }

        tracing::debug!(
            services = inventory.services.len(),
            directories = inventory.directories.len(),
            "Scanned icon roots"
        );
        Ok(inventory)
    }
}

/// One immediate subdirectory of an icon root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDirectory {
    pub name: String,
    pub path: PathBuf,
    /// SVG file names directly inside the directory, sorted
    pub files: Vec<String>,
}

/// List the immediate subdirectories of `root` and the SVG files directly in
/// each, both sorted by name. Deeper directories are not descended into.
pub fn scan_tree(root: &Path) -> Result<Vec<ScannedDirectory>> {
    require_root(root)?;

    let mut directories = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.path().is_dir() {
            continue;
        }

        let mut files = Vec::new();
        for file in WalkDir::new(entry.path())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let file = file.map_err(|e| walk_error(entry.path(), e))?;
            if file.path().is_file() && is_svg(file.path()) {
                files.push(file.file_name().to_string_lossy().into_owned());
            }
        }

        directories.push(ScannedDirectory {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            files,
        });
    }

    Ok(directories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<svg/>").unwrap();
    }

    #[test]
    fn require_root_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = require_root(&temp.path().join("official")).unwrap_err();
        assert!(matches!(err, IconMapError::PathNotFound { .. }));
        assert!(require_root(temp.path()).is_ok());
    }

    #[test]
    fn inventory_pools_roots_and_filters_svg() {
        let official = TempDir::new().unwrap();
        let manual = TempDir::new().unwrap();
        touch(official.path(), "compute/10001-icon-service-Virtual-Machine.svg");
        touch(official.path(), "compute/readme.txt");
        touch(official.path(), "Storage/deep/Blob_COLOR.SVG");
        touch(manual.path(), "custom/Widget(m).svg");

        let inventory = Inventory::scan(&[official.path(), manual.path()]).unwrap();

        let services: Vec<_> = inventory.services.iter().cloned().collect();
        assert_eq!(services, vec!["Blob", "Virtual-Machine", "Widget"]);

        let directories: Vec<_> = inventory.directories.iter().cloned().collect();
        assert_eq!(directories, vec!["compute", "custom", "deep", "storage"]);

        assert!(inventory.by_directory["compute"].contains("Virtual-Machine"));
        assert!(inventory.by_directory["deep"].contains("Blob"));
    }

    #[test]
    fn inventory_deduplicates_service_names() {
        let official = TempDir::new().unwrap();
        touch(official.path(), "a/Bastion.svg");
        touch(official.path(), "b/Bastion_COLOR.svg");

        let inventory = Inventory::scan(&[official.path()]).unwrap();
        assert_eq!(inventory.services.len(), 1);
    }

    #[test]
    fn scan_tree_lists_first_level_only() {
        let root = TempDir::new().unwrap();
        touch(root.path(), "storage/b.svg");
        touch(root.path(), "storage/a.svg");
        touch(root.path(), "storage/nested/c.svg");
        touch(root.path(), "compute/notes.md");
        touch(root.path(), "top-level.svg");

        let tree = scan_tree(root.path()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "compute");
        assert!(tree[0].files.is_empty());
        assert_eq!(tree[1].name, "storage");
        assert_eq!(tree[1].files, vec!["a.svg", "b.svg"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_icons_and_directories_are_scanned() {
        use std::os::unix::fs::symlink;

        let shared = TempDir::new().unwrap();
        let official = TempDir::new().unwrap();
        touch(shared.path(), "Blob.svg");
        touch(shared.path(), "networking/Front-Doors.svg");
        fs::create_dir_all(official.path().join("storage")).unwrap();
        symlink(
            shared.path().join("Blob.svg"),
            official.path().join("storage/Blob.svg"),
        )
        .unwrap();
        symlink(
            shared.path().join("networking"),
            official.path().join("networking"),
        )
        .unwrap();

        let inventory = Inventory::scan(&[official.path()]).unwrap();
        assert!(inventory.services.contains("Blob"));
        assert!(inventory.by_directory["storage"].contains("Blob"));
        assert!(inventory.directories.contains("networking"));

        let tree = scan_tree(official.path()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "networking");
        assert_eq!(tree[0].files, vec!["Front-Doors.svg"]);
        assert_eq!(tree[1].files, vec!["Blob.svg"]);
    }

    #[test]
    fn walk_failure_names_the_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("official");

        let err = Inventory::scan(&[&missing]).unwrap_err();
        match err {
            IconMapError::Scan { path, .. } => assert_eq!(path, missing),
            other => panic!("expected scan error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_fails_the_scan() {
        use std::os::unix::fs::PermissionsExt;

        let official = TempDir::new().unwrap();
        touch(official.path(), "storage/Blob.svg");
        let storage = official.path().join("storage");
        fs::set_permissions(&storage, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory
        let readable = fs::read_dir(&storage).is_ok();
        let inventory = Inventory::scan(&[official.path()]);
        let tree = scan_tree(official.path());
        fs::set_permissions(&storage, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert!(matches!(
            inventory.unwrap_err(),
            IconMapError::Scan { path, .. } if path == storage
        ));
        assert!(matches!(tree.unwrap_err(), IconMapError::Scan { .. }));
    }
}
