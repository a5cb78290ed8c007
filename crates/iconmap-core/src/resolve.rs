//! Map catalog services back to the SVG files they were derived from.
//!
//! A service `Source` is tried against these file name patterns, in order,
//! first below the official root and then below the manual root:
//!
//! - `*-icon-service-<Source>.svg`
//! - `<Source>_COLOR.svg`
//! - `<Source>.svg`
//!
//! Spaces in the source are matched as hyphens. Matching ignores case.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::catalog::{Catalog, LookupEntry};
use crate::error::Result;
use crate::naming::is_svg;
use crate::scan::walk_error;

const FILE_PATTERNS: &[&str] = &["*-icon-service-{}.svg", "{}_COLOR.svg", "{}.svg"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Outcome of resolving one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(PathBuf),
    /// Several files matched; the first one is used
    Ambiguous {
        chosen: PathBuf,
        candidates: Vec<PathBuf>,
    },
    Missing,
}

/// Indexes the SVG files of each root once, then answers lookups
#[derive(Debug, Clone)]
pub struct IconResolver {
    roots: Vec<Vec<(String, PathBuf)>>,
}

impl IconResolver {
    /// Index `roots` in priority order. Roots must exist; see
    /// [`require_root`](crate::scan::require_root).
    pub fn new<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        let mut indexed = Vec::with_capacity(roots.len());

        for root in roots {
            let root: &Path = root.as_ref();
            let mut files = Vec::new();
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = entry.map_err(|e| walk_error(root, e))?;
                if entry.path().is_file() && is_svg(entry.path()) {
                    files.push((
                        entry.file_name().to_string_lossy().into_owned(),
                        entry.path().to_path_buf(),
                    ));
                }
            }
            indexed.push(files);
        }

        Ok(Self { roots: indexed })
    }

    pub fn resolve(&self, source: &str) -> Resolution {
        let escaped = Pattern::escape(&source.replace(' ', "-"));

        for template in FILE_PATTERNS {
            let Ok(pattern) = Pattern::new(&template.replace("{}", &escaped)) else {
                continue;
            };

            for files in &self.roots {
                let mut hits: Vec<PathBuf> = files
                    .iter()
                    .filter(|(name, _)| pattern.matches_with(name, MATCH_OPTIONS))
                    .map(|(_, path)| path.clone())
                    .collect();

                match hits.len() {
                    0 => continue,
                    1 => return Resolution::Found(hits.remove(0)),
                    _ => {
                        return Resolution::Ambiguous {
                            chosen: hits[0].clone(),
                            candidates: hits,
                        }
                    }
                }
            }
        }

        Resolution::Missing
    }
}

/// Result of checking every catalog service against the icon roots
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub found: usize,
    pub missing: Vec<LookupEntry>,
    pub ambiguous: Vec<(LookupEntry, Vec<PathBuf>)>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve every service in the catalog
pub fn check_catalog(catalog: &Catalog, resolver: &IconResolver) -> CheckReport {
    let mut report = CheckReport::default();

    for entry in catalog.lookup() {
        match resolver.resolve(&entry.source) {
            Resolution::Found(_) => report.found += 1,
            Resolution::Ambiguous { candidates, .. } => {
                tracing::warn!(
                    "File found in multiple locations {}: {}",
                    entry.source,
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                );
                report.found += 1;
                report.ambiguous.push((entry, candidates));
            }
            Resolution::Missing => {
                tracing::warn!("Missing SVG file for: {}", entry.source);
                report.missing.push(entry);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Service};
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<svg/>").unwrap();
        path
    }

    #[test]
    fn resolves_vendor_prefixed_file_with_spaces_as_hyphens() {
        let official = TempDir::new().unwrap();
        let path = touch(official.path(), "compute/10001-icon-service-Virtual-Machine.svg");

        let resolver = IconResolver::new(&[official.path()]).unwrap();
        assert_eq!(resolver.resolve("virtual machine"), Resolution::Found(path));
    }

    #[test]
    fn official_root_wins_over_manual() {
        let official = TempDir::new().unwrap();
        let manual = TempDir::new().unwrap();
        let preferred = touch(official.path(), "storage/Blob_COLOR.svg");
        touch(manual.path(), "storage/Blob_COLOR.svg");

        let resolver = IconResolver::new(&[official.path(), manual.path()]).unwrap();
        assert_eq!(resolver.resolve("Blob"), Resolution::Found(preferred));
    }

    #[test]
    fn falls_back_to_plain_file_name() {
        let manual = TempDir::new().unwrap();
        let path = touch(manual.path(), "misc/Widget.SVG");

        let resolver = IconResolver::new(&[manual.path()]).unwrap();
        assert_eq!(resolver.resolve("widget"), Resolution::Found(path));
        assert_eq!(resolver.resolve("gadget"), Resolution::Missing);
    }

    #[test]
    fn duplicate_matches_are_ambiguous() {
        let official = TempDir::new().unwrap();
        touch(official.path(), "a/1-icon-service-Bastion.svg");
        touch(official.path(), "b/2-icon-service-Bastion.svg");

        let resolver = IconResolver::new(&[official.path()]).unwrap();
        match resolver.resolve("Bastion") {
            Resolution::Ambiguous { chosen, candidates } => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(chosen, candidates[0]);
            }
            other => panic!("expected ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn check_reports_missing_services() {
        let official = TempDir::new().unwrap();
        touch(official.path(), "storage/Blob.svg");
        let catalog = Catalog {
            categories: vec![Category {
                name: "Storage".to_string(),
                services: vec![
                    Service::new("Blob", "AzureBlob"),
                    Service::new("Gone", "AzureGone"),
                ],
            }],
        };

        let resolver = IconResolver::new(&[official.path()]).unwrap();
        let report = check_catalog(&catalog, &resolver);
        assert_eq!(report.found, 1);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].source, "Gone");
        assert!(!report.is_clean());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_icon_resolves() {
        let shared = TempDir::new().unwrap();
        let official = TempDir::new().unwrap();
        let target = touch(shared.path(), "Blob_COLOR.svg");
        fs::create_dir_all(official.path().join("storage")).unwrap();
        let link = official.path().join("storage/Blob_COLOR.svg");
        std::os::unix::fs::symlink(target, &link).unwrap();

        let resolver = IconResolver::new(&[official.path()]).unwrap();
        assert_eq!(resolver.resolve("Blob"), Resolution::Found(link));
    }

    #[test]
    fn missing_root_is_a_scan_error() {
        let temp = TempDir::new().unwrap();
        let err = IconResolver::new(&[temp.path().join("manual")]).unwrap_err();
        assert!(matches!(err, crate::error::IconMapError::Scan { .. }));
    }
}
