//! Route resolution for handler candidates.
//!
//! Explicit route annotation values always win. Without them a candidate is only
//! mapped when its name carries the marker segment, in which case a single route
//! is derived from the part of the name after `<marker>/`.

use crate::error::ResolveError;
use crate::model::RouteMapping;
use crate::store::AnnotationStore;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub const DEFAULT_ROUTE_ANNOTATION: &str = "ro.appenigne.web.framework.annotation.UrlPattern";
pub const DEFAULT_ROLE_ANNOTATION: &str = "ro.appenigne.web.framework.annotation.RequiredType";
pub const DEFAULT_ELEVATED_ROLE: &str = "SuperAdministrator";
pub const DEFAULT_MARKER_SEGMENT: &str = "controller";
pub const DEFAULT_ROUTE_ROOT: &str = "/do/";

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub route_annotation: String,
    pub role_annotation: String,
    pub elevated_role: String,
    pub marker_segment: String,
    pub route_root: String,
    /// Never mapped and not reported as skipped.
    pub excluded_types: BTreeSet<String>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            route_annotation: DEFAULT_ROUTE_ANNOTATION.to_string(),
            role_annotation: DEFAULT_ROLE_ANNOTATION.to_string(),
            elevated_role: DEFAULT_ELEVATED_ROLE.to_string(),
            marker_segment: DEFAULT_MARKER_SEGMENT.to_string(),
            route_root: DEFAULT_ROUTE_ROOT.to_string(),
            excluded_types: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Ordered by type name.
    pub mappings: Vec<RouteMapping>,
    /// Candidates without explicit routes that fail the naming convention.
    pub skipped: Vec<String>,
}

impl Resolution {
    pub fn pattern_count(&self) -> usize {
        self.mappings.iter().map(|m| m.patterns.len()).sum()
    }

    pub fn elevated_pattern_count(&self) -> usize {
        self.mappings
            .iter()
            .filter(|m| m.requires_elevated_role)
            .map(|m| m.patterns.len())
            .sum()
    }
}

pub struct RouteResolver<'a> {
    policy: &'a RoutePolicy,
}

impl<'a> RouteResolver<'a> {
    pub fn new(policy: &'a RoutePolicy) -> Self {
        Self { policy }
    }

    /// Resolves every candidate. Iterating a `BTreeSet` keeps the output in
    /// lexicographic type order regardless of how the candidates were discovered.
    pub fn resolve(
        &self,
        candidates: &BTreeSet<String>,
        store: &AnnotationStore,
    ) -> Result<Resolution, ResolveError> {
        let mut resolution = Resolution::default();

        for type_name in candidates {
            if self.policy.excluded_types.contains(type_name) {
                debug!("Excluded by configuration: {}", type_name);
                continue;
            }
            match self.resolve_one(type_name, store)? {
                Some(mapping) => resolution.mappings.push(mapping),
                None => {
                    info!("Servlet mapping skipped: {}", type_name);
                    resolution.skipped.push(type_name.clone());
                }
            }
        }

        Ok(resolution)
    }

    fn resolve_one(
        &self,
        type_name: &str,
        store: &AnnotationStore,
    ) -> Result<Option<RouteMapping>, ResolveError> {
        let explicit = store.values_for(type_name, &self.policy.route_annotation);

        let patterns: Vec<String> = if !explicit.is_empty() {
            explicit
                .iter()
                .cloned()
                .collect::<IndexSet<String>>()
                .into_iter()
                .collect()
        } else if type_name.contains(self.policy.marker_segment.as_str()) {
            vec![self.conventional_pattern(type_name)?]
        } else {
            return Ok(None);
        };

        Ok(Some(RouteMapping {
            type_name: type_name.to_string(),
            synthetic_name: RouteMapping::synthetic_name_for(type_name),
            patterns,
            requires_elevated_role: self.requires_elevated_role(type_name, store),
        }))
    }

    /// `a.b.controller.widget.WidgetHandler` -> `/do/widget/WidgetHandler`.
    fn conventional_pattern(&self, type_name: &str) -> Result<String, ResolveError> {
        let slashed = type_name.replace('.', "/");
        let segment = format!("{}/", self.policy.marker_segment);
        let start = slashed
            .find(&segment)
            .ok_or_else(|| ResolveError::MarkerSegmentMissing {
                type_name: type_name.to_string(),
                marker: self.policy.marker_segment.clone(),
            })?;
        Ok(format!(
            "{}{}",
            self.policy.route_root,
            &slashed[start + segment.len()..]
        ))
    }

    /// Only a single role value equal to the elevated marker counts.
    fn requires_elevated_role(&self, type_name: &str, store: &AnnotationStore) -> bool {
        matches!(
            store.values_for(type_name, &self.policy.role_annotation),
            [role] if *role == self.policy.elevated_role
        )
    }
}
