//! Generated region bodies for the two deployment descriptors.
//!
//! A rendered fragment is everything strictly between the start and end markers:
//! a line break, one or more generated lines, and the indentation that precedes
//! the end marker.

use crate::model::RouteMapping;

/// Line terminator of the document being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

pub trait FragmentShape: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, mappings: &[RouteMapping], eol: LineEnding) -> String;
}

/// `web.xml` shape: one `<servlet>` plus its `<servlet-mapping>`s per line.
#[derive(Debug, Clone, Default)]
pub struct ServletMappings {
    /// Also emit a `<security-constraint>` for mappings that need the elevated role.
    pub security_constraints: bool,
}

impl ServletMappings {
    const INDENT: &'static str = "    ";
    const ADMIN_ROLE: &'static str = "admin";

    fn push_servlet(&self, out: &mut String, mapping: &RouteMapping) {
        let servlet_name = xml_escape(&mapping.synthetic_name);
        out.push_str(Self::INDENT);
        out.push_str("<servlet><servlet-name>");
        out.push_str(&servlet_name);
        out.push_str("</servlet-name><servlet-class>");
        out.push_str(&xml_escape(&mapping.type_name));
        out.push_str("</servlet-class></servlet>");
        for pattern in &mapping.patterns {
            out.push_str("<servlet-mapping><servlet-name>");
            out.push_str(&servlet_name);
            out.push_str("</servlet-name><url-pattern>");
            out.push_str(&xml_escape(pattern));
            out.push_str("</url-pattern></servlet-mapping>");
        }
    }

    fn push_security_constraint(&self, out: &mut String, mapping: &RouteMapping) {
        out.push_str(Self::INDENT);
        out.push_str("<security-constraint><web-resource-collection><web-resource-name>");
        out.push_str(&xml_escape(&mapping.synthetic_name));
        out.push_str("</web-resource-name>");
        for pattern in &mapping.patterns {
            out.push_str("<url-pattern>");
            out.push_str(&xml_escape(pattern));
            out.push_str("</url-pattern>");
        }
        out.push_str("</web-resource-collection><auth-constraint><role-name>");
        out.push_str(Self::ADMIN_ROLE);
        out.push_str("</role-name></auth-constraint></security-constraint>");
    }
}

impl FragmentShape for ServletMappings {
    fn name(&self) -> &str {
        "servlet-mappings"
    }

    fn render(&self, mappings: &[RouteMapping], eol: LineEnding) -> String {
        let eol = eol.as_str();
        let mut out = String::from(eol);
        for mapping in mappings {
            self.push_servlet(&mut out, mapping);
            out.push_str(eol);
            if self.security_constraints && mapping.requires_elevated_role {
                self.push_security_constraint(&mut out, mapping);
                out.push_str(eol);
            }
        }
        out.push_str(Self::INDENT);
        out
    }
}

/// `appengine-web.xml` shape: one `url:` system property per route.
#[derive(Debug, Clone, Default)]
pub struct SystemProperties;

impl SystemProperties {
    const INDENT: &'static str = "        ";
}

impl FragmentShape for SystemProperties {
    fn name(&self) -> &str {
        "system-properties"
    }

    fn render(&self, mappings: &[RouteMapping], eol: LineEnding) -> String {
        let eol = eol.as_str();
        let mut out = String::from(eol);
        for mapping in mappings {
            for pattern in &mapping.patterns {
                out.push_str(Self::INDENT);
                out.push_str("<property name=\"url:");
                out.push_str(&xml_escape(pattern));
                out.push_str("\" value=\"");
                out.push_str(&xml_escape(&mapping.type_name));
                out.push_str("\"/>");
                out.push_str(eol);
            }
        }
        out.push_str(Self::INDENT);
        out
    }
}

/// Escapes markup characters. CR and LF become character references, so the
/// output never contains a raw line break.
pub fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\r' => escaped.push_str("&#13;"),
            '\n' => escaped.push_str("&#10;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
