use crate::error::Result;
use crate::filter::{DEFAULT_INCLUDE_EXCLUDE, InputFilter};
use crate::resolver::{
    DEFAULT_ELEVATED_ROLE, DEFAULT_MARKER_SEGMENT, DEFAULT_ROLE_ANNOTATION,
    DEFAULT_ROUTE_ANNOTATION, DEFAULT_ROUTE_ROOT, RoutePolicy,
};
use crate::scan::{ScanOptions, ScannerKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HANDLER_BASE: &str = "ro.appenigne.web.framework.servlet.AbstractIController";
pub const DEFAULT_SERVLET_BASE: &str = "javax.servlet.http.HttpServlet";

/// Run configuration. Every field has a default, so a JSON file only needs the
/// keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WebMapConfig {
    pub include_exclude: String,
    /// Base type of the handlers listed in `appengine-web.xml`.
    pub handler_base: String,
    /// Base type of the servlets listed in `web.xml`.
    pub servlet_base: String,
    pub route_annotation: String,
    pub role_annotation: String,
    pub elevated_role: String,
    pub marker_segment: String,
    pub route_root: String,
    pub exclude_classes: Vec<String>,
    pub parallel: bool,
    pub threads: Option<usize>,
    pub scanners: Vec<ScannerKind>,
    pub web_xml: Option<PathBuf>,
    pub appengine_web_xml: Option<PathBuf>,
    pub security_constraints: bool,
}

impl Default for WebMapConfig {
    fn default() -> Self {
        Self {
            include_exclude: DEFAULT_INCLUDE_EXCLUDE.to_string(),
            handler_base: DEFAULT_HANDLER_BASE.to_string(),
            servlet_base: DEFAULT_SERVLET_BASE.to_string(),
            route_annotation: DEFAULT_ROUTE_ANNOTATION.to_string(),
            role_annotation: DEFAULT_ROLE_ANNOTATION.to_string(),
            elevated_role: DEFAULT_ELEVATED_ROLE.to_string(),
            marker_segment: DEFAULT_MARKER_SEGMENT.to_string(),
            route_root: DEFAULT_ROUTE_ROOT.to_string(),
            exclude_classes: Vec::new(),
            parallel: false,
            threads: None,
            scanners: vec![ScannerKind::Subtypes, ScannerKind::Annotations],
            web_xml: None,
            appengine_web_xml: None,
            security_constraints: false,
        }
    }
}

impl WebMapConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn scan_options(&self) -> Result<ScanOptions> {
        Ok(ScanOptions {
            filter: InputFilter::parse(&self.include_exclude)?,
            scanners: self.scanners.clone(),
            parallel: self.parallel,
            threads: self.threads,
        })
    }

    pub fn route_policy(&self) -> RoutePolicy {
        RoutePolicy {
            route_annotation: self.route_annotation.clone(),
            role_annotation: self.role_annotation.clone(),
            elevated_role: self.elevated_role.clone(),
            marker_segment: self.marker_segment.clone(),
            route_root: self.route_root.clone(),
            excluded_types: self.exclude_classes.iter().cloned().collect(),
        }
    }

    /// `web.xml` location, defaulting to `<webapp>/WEB-INF/web.xml`.
    pub fn web_xml_path(&self, webapp: &Path) -> PathBuf {
        self.web_xml
            .clone()
            .unwrap_or_else(|| webapp.join("WEB-INF").join("web.xml"))
    }

    pub fn appengine_web_xml_path(&self, webapp: &Path) -> PathBuf {
        self.appengine_web_xml
            .clone()
            .unwrap_or_else(|| webapp.join("WEB-INF").join("appengine-web.xml"))
    }
}
