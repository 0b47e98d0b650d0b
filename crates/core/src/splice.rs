//! Idempotent replacement of the generated region inside a text document.
//!
//! The region is delimited by [`START_MARKER`] and [`END_MARKER`]. When it exists,
//! only the text strictly between the markers is replaced. Otherwise the markers
//! and the fragment are inserted at the first insertion point whose anchor is
//! present. Text outside the region is never touched.

use crate::error::SpliceError;
use crate::fragment::LineEnding;
use serde::{Deserialize, Serialize};

pub const START_MARKER: &str = "<!-- Generated servlet mapping -->";
pub const END_MARKER: &str = "<!-- End Generated servlet mapping -->";

/// Where a missing region goes: right before `anchor`, wrapped in `lead` and `trail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    pub anchor: String,
    /// Text placed before the start marker.
    pub lead: String,
    /// Text placed after the end marker.
    pub trail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentLayout {
    /// `WEB-INF/web.xml`
    WebApp,
    /// `WEB-INF/appengine-web.xml`
    AppEngineWebApp,
}

impl DocumentLayout {
    /// Candidate insertion points, in order of preference.
    pub fn insertion_points(self, eol: LineEnding) -> Vec<InsertionPoint> {
        let eol = eol.as_str();
        match self {
            DocumentLayout::WebApp => vec![InsertionPoint {
                anchor: "</web-app>".to_string(),
                lead: format!("{eol}    "),
                trail: eol.to_string(),
            }],
            DocumentLayout::AppEngineWebApp => vec![
                InsertionPoint {
                    anchor: "</system-properties>".to_string(),
                    lead: format!("{eol}        "),
                    trail: format!("{eol}    "),
                },
                // no <system-properties> section yet: open one
                InsertionPoint {
                    anchor: "</appengine-web-app>".to_string(),
                    lead: format!("{eol}    <system-properties>{eol}        "),
                    trail: format!("{eol}    </system-properties>{eol}"),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    NoRegion,
    /// Byte range of the region body, between the markers.
    RegionPresent { body_start: usize, body_end: usize },
}

impl RegionState {
    pub fn detect(text: &str) -> Result<Self, SpliceError> {
        let Some(start) = text.find(START_MARKER) else {
            return Ok(RegionState::NoRegion);
        };
        let body_start = start + START_MARKER.len();
        let body_end = text[body_start..]
            .find(END_MARKER)
            .map(|offset| body_start + offset)
            .ok_or(SpliceError::UnterminatedRegion)?;
        Ok(RegionState::RegionPresent {
            body_start,
            body_end,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpliceAction {
    Inserted,
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub text: String,
    pub action: SpliceAction,
}

/// Replaces (or inserts) the generated region of `text` with `fragment`.
pub fn splice(
    text: &str,
    fragment: &str,
    layout: DocumentLayout,
) -> Result<Spliced, SpliceError> {
    match RegionState::detect(text)? {
        RegionState::RegionPresent {
            body_start,
            body_end,
        } => {
            let mut out = String::with_capacity(text.len() + fragment.len());
            out.push_str(&text[..body_start]);
            out.push_str(fragment);
            out.push_str(&text[body_end..]);
            Ok(Spliced {
                text: out,
                action: SpliceAction::Replaced,
            })
        }
        RegionState::NoRegion => {
            let points = layout.insertion_points(LineEnding::detect(text));
            let (point, at) = points
                .iter()
                .find_map(|p| text.find(&p.anchor).map(|at| (p, at)))
                .ok_or_else(|| SpliceError::AnchorNotFound {
                    anchors: points.iter().map(|p| p.anchor.clone()).collect(),
                })?;

            let mut out = String::with_capacity(text.len() + fragment.len() + 128);
            out.push_str(&text[..at]);
            out.push_str(&point.lead);
            out.push_str(START_MARKER);
            out.push_str(fragment);
            out.push_str(END_MARKER);
            out.push_str(&point.trail);
            out.push_str(&text[at..]);
            Ok(Spliced {
                text: out,
                action: SpliceAction::Inserted,
            })
        }
    }
}
