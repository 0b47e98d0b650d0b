//! Orchestrates scan, resolution and splicing over the two descriptors.
//!
//! Both documents are read and spliced in memory first; nothing is written unless
//! every target succeeded.

use crate::config::WebMapConfig;
use crate::error::{Result, WebMapError};
use crate::fragment::{FragmentShape, LineEnding, ServletMappings, SystemProperties};
use crate::resolver::{Resolution, RouteResolver};
use crate::scan::{ClassReader, ScanOutput, ScanStats, Scanner};
use crate::splice::{DocumentLayout, SpliceAction, splice};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// Which run totals a target's resolution contributes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Emitted route patterns.
    pub mappings: bool,
    /// Candidates dropped by the naming convention.
    pub skipped: bool,
    /// Route patterns of mappings that require the elevated role.
    pub elevated: bool,
}

/// One document to regenerate: which base type feeds it and how its region looks.
pub struct Target {
    pub base_type: String,
    pub path: PathBuf,
    pub layout: DocumentLayout,
    pub shape: Box<dyn FragmentShape>,
    pub tally: Tally,
}

impl Target {
    /// The `web.xml` target (servlet subclasses) followed by the
    /// `appengine-web.xml` target (handler subclasses).
    ///
    /// Every handler is also a servlet, so each total is taken from one target
    /// only: mappings and skips from `web.xml`, elevated routes from the handlers.
    pub fn defaults(config: &WebMapConfig, webapp: &Path) -> Vec<Target> {
        vec![
            Target {
                base_type: config.servlet_base.clone(),
                path: config.web_xml_path(webapp),
                layout: DocumentLayout::WebApp,
                shape: Box::new(ServletMappings {
                    security_constraints: config.security_constraints,
                }),
                tally: Tally {
                    mappings: true,
                    skipped: true,
                    elevated: false,
                },
            },
            Target {
                base_type: config.handler_base.clone(),
                path: config.appengine_web_xml_path(webapp),
                layout: DocumentLayout::AppEngineWebApp,
                shape: Box::new(SystemProperties),
                tally: Tally {
                    elevated: true,
                    ..Tally::default()
                },
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub base_type: String,
    pub document: PathBuf,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub action: SpliceAction,
    pub changed: bool,
    pub mappings: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Route patterns emitted by targets that tally mappings.
    pub mappings_generated: usize,
    /// Candidates without routes that fail the convention, from targets that tally skips.
    pub skipped: usize,
    /// Elevated route patterns from targets that tally them.
    pub elevated: usize,
    pub documents: Vec<DocumentReport>,
    pub scan: ScanStats,
}

pub struct Driver<'a> {
    config: &'a WebMapConfig,
    reader: &'a dyn ClassReader,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a WebMapConfig, reader: &'a dyn ClassReader) -> Self {
        Self { config, reader }
    }

    pub fn scan(&self, artifacts: &[PathBuf]) -> Result<ScanOutput> {
        let _span = info_span!("scan", artifacts = artifacts.len()).entered();
        Scanner::new(self.reader, self.config.scan_options()?).scan(artifacts)
    }

    /// One resolution per target, in target order.
    pub fn resolve(&self, scan: &ScanOutput, targets: &[Target]) -> Result<Vec<TargetReport>> {
        let policy = self.config.route_policy();
        let resolver = RouteResolver::new(&policy);
        targets
            .iter()
            .map(|target| -> Result<TargetReport> {
                let _span = info_span!("resolve", base = %target.base_type).entered();
                let candidates = scan.index.subtypes_of(&target.base_type);
                info!(
                    "Number of classes that extend {}: {}",
                    target.base_type,
                    candidates.len()
                );
                Ok(TargetReport {
                    base_type: target.base_type.clone(),
                    document: target.path.clone(),
                    resolution: resolver.resolve(&candidates, &scan.store)?,
                })
            })
            .collect()
    }

    /// Scans and resolves without touching any document.
    pub fn inspect(&self, artifacts: &[PathBuf], targets: &[Target]) -> Result<Vec<TargetReport>> {
        let scan = self.scan(artifacts)?;
        self.resolve(&scan, targets)
    }

    pub fn run(&self, artifacts: &[PathBuf], targets: &[Target]) -> Result<RunSummary> {
        let scan = self.scan(artifacts)?;
        let reports = self.resolve(&scan, targets)?;

        let mut summary = RunSummary {
            scan: scan.stats.clone(),
            ..RunSummary::default()
        };
        let mut pending = Vec::with_capacity(targets.len());

        for (target, report) in targets.iter().zip(&reports) {
            let _span = info_span!(
                "splice",
                document = %target.path.display(),
                shape = target.shape.name()
            )
            .entered();
            let current = std::fs::read_to_string(&target.path).map_err(|source| {
                WebMapError::DocumentRead {
                    path: target.path.clone(),
                    source,
                }
            })?;
            let fragment = target
                .shape
                .render(&report.resolution.mappings, LineEnding::detect(&current));
            let spliced =
                splice(&current, &fragment, target.layout).map_err(|source| WebMapError::Splice {
                    path: target.path.clone(),
                    source,
                })?;

            let changed = spliced.text != current;
            if target.tally.mappings {
                summary.mappings_generated += report.resolution.pattern_count();
            }
            if target.tally.skipped {
                summary.skipped += report.resolution.skipped.len();
            }
            if target.tally.elevated {
                summary.elevated += report.resolution.elevated_pattern_count();
            }
            summary.documents.push(DocumentReport {
                path: target.path.clone(),
                action: spliced.action,
                changed,
                mappings: report.resolution.mappings.len(),
            });
            if changed {
                pending.push((target.path.clone(), spliced.text));
            } else {
                info!("{} is up to date", target.path.display());
            }
        }

        for (path, text) in pending {
            std::fs::write(&path, text)
                .map_err(|source| WebMapError::DocumentWrite { path, source })?;
        }

        info!("Number of servlet mapping generated: {}", summary.mappings_generated);
        info!("Number of servlet mapping skipped: {}", summary.skipped);
        info!("Number of security constraints generated: {}", summary.elevated);
        Ok(summary)
    }
}
