//! Artifact scanning: turns class directories and archives into a type index and
//! an annotation store.
//!
//! Reading class files is delegated to a [`ClassReader`]. Each artifact is read
//! independently (optionally on a rayon pool) and produces an immutable
//! [`ArtifactScan`]; the calling thread merges the results in artifact order.

use crate::error::{Result, WebMapError};
use crate::filter::InputFilter;
use crate::index::TypeGraphIndex;
use crate::model::{ClassRecord, TypeDescriptor};
use crate::store::AnnotationStore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Annotation member whose value is recorded.
pub const VALUE_MEMBER: &str = "value";

/// Reads compiled classes out of one artifact without loading them.
pub trait ClassReader: Send + Sync {
    fn can_read(&self, artifact: &Path) -> bool;

    /// Parses every class entry accepted by `filter`.
    ///
    /// Entries that fail to parse are reported in [`ArtifactScan::failed_entries`];
    /// an `Err` means the artifact as a whole could not be opened.
    fn read(
        &self,
        artifact: &Path,
        filter: &InputFilter,
    ) -> std::result::Result<ArtifactScan, BoxError>;
}

/// Result of reading a single artifact.
#[derive(Debug, Default, Clone)]
pub struct ArtifactScan {
    pub records: Vec<ClassRecord>,
    pub filtered_entries: usize,
    pub failed_entries: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    /// Records supertypes for the type index.
    Subtypes,
    /// Records `value` members of runtime-visible annotations.
    Annotations,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub filter: InputFilter,
    pub scanners: Vec<ScannerKind>,
    pub parallel: bool,
    /// Worker count for parallel scans; `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            filter: InputFilter::accept_all(),
            scanners: vec![ScannerKind::Subtypes, ScannerKind::Annotations],
            parallel: false,
            threads: None,
        }
    }
}

impl ScanOptions {
    fn enabled(&self, kind: ScannerKind) -> bool {
        self.scanners.contains(&kind)
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStats {
    pub artifacts: usize,
    pub unreadable_artifacts: usize,
    pub classes: usize,
    pub filtered_entries: usize,
    pub failed_entries: usize,
    pub annotation_values: usize,
    #[serde(skip)]
    pub duration: Duration,
}

/// Merged output of a scan.
#[derive(Debug, Default)]
pub struct ScanOutput {
    pub index: TypeGraphIndex,
    pub store: AnnotationStore,
    pub stats: ScanStats,
}

pub struct Scanner<'a> {
    reader: &'a dyn ClassReader,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(reader: &'a dyn ClassReader, options: ScanOptions) -> Self {
        Self { reader, options }
    }

    pub fn scan(&self, artifacts: &[PathBuf]) -> Result<ScanOutput> {
        let start = Instant::now();

        let per_artifact: Vec<Option<ArtifactScan>> = if !self.options.parallel {
            artifacts.iter().map(|a| self.read_artifact(a)).collect()
        } else if let Some(threads) = self.options.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| WebMapError::WorkerPool(e.to_string()))?;
            pool.install(|| {
                artifacts
                    .par_iter()
                    .map(|a| self.read_artifact(a))
                    .collect::<Vec<_>>()
            })
        } else {
            artifacts
                .par_iter()
                .map(|a| self.read_artifact(a))
                .collect::<Vec<_>>()
        };

        let mut output = self.merge(per_artifact);
        output.stats.artifacts = artifacts.len();
        output.stats.duration = start.elapsed();
        info!(
            "Scan complete: {} artifacts, {} classes, {} known types, {} annotation values in {:?}",
            output.stats.artifacts,
            output.stats.classes,
            output.index.len(),
            output.stats.annotation_values,
            output.stats.duration
        );
        Ok(output)
    }

    fn read_artifact(&self, artifact: &Path) -> Option<ArtifactScan> {
        if !self.reader.can_read(artifact) {
            debug!("No reader for {:?}", artifact);
            return None;
        }
        match self.reader.read(artifact, &self.options.filter) {
            Ok(scan) => {
                debug!(
                    "Read {} classes from {:?} ({} filtered, {} failed)",
                    scan.records.len(),
                    artifact,
                    scan.filtered_entries,
                    scan.failed_entries
                );
                Some(scan)
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}", artifact, e);
                None
            }
        }
    }

    /// Single writer pass over the worker results, in artifact order.
    fn merge(&self, per_artifact: Vec<Option<ArtifactScan>>) -> ScanOutput {
        let mut stats = ScanStats::default();
        let mut descriptors: Vec<TypeDescriptor> = Vec::new();
        let mut store = AnnotationStore::new();

        for scan in per_artifact {
            let Some(scan) = scan else {
                stats.unreadable_artifacts += 1;
                continue;
            };
            stats.filtered_entries += scan.filtered_entries;
            stats.failed_entries += scan.failed_entries;

            for record in scan.records {
                stats.classes += 1;
                if self.options.enabled(ScannerKind::Annotations) {
                    let owner = &record.descriptor.name;
                    for annotation in &record.annotations {
                        if let Some(value) = annotation.member(VALUE_MEMBER) {
                            stats.annotation_values +=
                                store.record_annotation(owner, &annotation.type_name, value);
                        }
                    }
                }
                if self.options.enabled(ScannerKind::Subtypes) {
                    descriptors.push(record.descriptor);
                }
            }
        }

        ScanOutput {
            index: TypeGraphIndex::build(&descriptors),
            store,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationValue, DeclaredAnnotation};
    use std::collections::HashMap;

    /// Serves canned records keyed by artifact path.
    struct MockReader {
        artifacts: HashMap<PathBuf, Vec<ClassRecord>>,
    }

    impl ClassReader for MockReader {
        fn can_read(&self, artifact: &Path) -> bool {
            artifact.extension().is_some_and(|e| e == "jar")
        }

        fn read(
            &self,
            artifact: &Path,
            filter: &InputFilter,
        ) -> std::result::Result<ArtifactScan, BoxError> {
            let records = self
                .artifacts
                .get(artifact)
                .ok_or_else(|| format!("missing {}", artifact.display()))?;
            let mut scan = ArtifactScan::default();
            for record in records {
                if filter.accepts(&format!("{}.class", record.descriptor.name)) {
                    scan.records.push(record.clone());
                } else {
                    scan.filtered_entries += 1;
                }
            }
            Ok(scan)
        }
    }

    fn record(name: &str, sup: &str, routes: &[&str]) -> ClassRecord {
        let annotations = if routes.is_empty() {
            vec![]
        } else {
            vec![DeclaredAnnotation {
                type_name: "app.UrlPattern".to_string(),
                members: vec![(
                    VALUE_MEMBER.to_string(),
                    AnnotationValue::Array(
                        routes
                            .iter()
                            .map(|r| AnnotationValue::Text(r.to_string()))
                            .collect(),
                    ),
                )],
            }]
        };
        ClassRecord {
            descriptor: TypeDescriptor::new(name, [sup.to_string()]),
            annotations,
        }
    }

    fn reader() -> MockReader {
        let mut artifacts = HashMap::new();
        artifacts.insert(
            PathBuf::from("a.jar"),
            vec![
                record("app.Base", "javax.servlet.http.HttpServlet", &[]),
                record("app.Home", "app.Base", &["/", "/home"]),
            ],
        );
        artifacts.insert(
            PathBuf::from("b.jar"),
            vec![record("lib.Other", "app.Base", &["/other"])],
        );
        MockReader { artifacts }
    }

    #[test]
    fn test_sequential_scan_merges_artifacts() {
        let reader = reader();
        let scanner = Scanner::new(&reader, ScanOptions::default());
        let output = scanner
            .scan(&[PathBuf::from("a.jar"), PathBuf::from("b.jar")])
            .unwrap();

        assert_eq!(output.stats.classes, 3);
        assert_eq!(output.stats.annotation_values, 3);
        assert_eq!(output.store.values_for("app.Home", "app.UrlPattern"), ["/", "/home"]);
        assert_eq!(
            output
                .index
                .subtypes_of("javax.servlet.http.HttpServlet")
                .len(),
            3
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let reader = reader();
        let artifacts = vec![PathBuf::from("b.jar"), PathBuf::from("a.jar")];
        let sequential = Scanner::new(&reader, ScanOptions::default())
            .scan(&artifacts)
            .unwrap();
        let parallel = Scanner::new(
            &reader,
            ScanOptions {
                parallel: true,
                threads: Some(2),
                ..ScanOptions::default()
            },
        )
        .scan(&artifacts)
        .unwrap();

        assert_eq!(
            sequential.index.subtypes_of("app.Base"),
            parallel.index.subtypes_of("app.Base")
        );
        assert_eq!(
            sequential.store.values_for("lib.Other", "app.UrlPattern"),
            parallel.store.values_for("lib.Other", "app.UrlPattern")
        );
    }

    #[test]
    fn test_unreadable_artifacts_are_counted_not_fatal() {
        let reader = reader();
        let output = Scanner::new(&reader, ScanOptions::default())
            .scan(&[
                PathBuf::from("a.jar"),
                PathBuf::from("missing.jar"),
                PathBuf::from("notes.txt"),
            ])
            .unwrap();
        assert_eq!(output.stats.artifacts, 3);
        assert_eq!(output.stats.unreadable_artifacts, 2);
        assert_eq!(output.stats.classes, 2);
    }

    #[test]
    fn test_filter_and_scanner_selection() {
        let reader = reader();
        let options = ScanOptions {
            filter: InputFilter::parse(r"-lib\..*").unwrap(),
            scanners: vec![ScannerKind::Subtypes],
            ..ScanOptions::default()
        };
        let output = Scanner::new(&reader, options)
            .scan(&[PathBuf::from("a.jar"), PathBuf::from("b.jar")])
            .unwrap();
        assert_eq!(output.stats.filtered_entries, 1);
        assert!(output.store.is_empty());
        assert_eq!(
            output.index.subtypes_of("app.Base").into_iter().collect::<Vec<_>>(),
            vec!["app.Home"]
        );
    }
}
