//! Include/exclude filter over class resource names.
//!
//! An expression is a comma-separated list of `+regex` / `-regex` entries. Inputs
//! are resource paths with `/` replaced by `.`, e.g. `com.acme.Foo.class`, and a
//! pattern has to match the whole input.

use crate::error::FilterError;
use regex::Regex;

pub const DEFAULT_INCLUDE_EXCLUDE: &str =
    r"-java\..*, -javax\..*, -sun\..*, -com\.sun\..*, +javax\.servlet\.http\..*";

#[derive(Debug, Clone)]
enum Rule {
    Include(Regex),
    Exclude(Regex),
}

#[derive(Debug, Clone, Default)]
pub struct InputFilter {
    chain: Vec<Rule>,
}

impl InputFilter {
    /// Accepts everything.
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn parse(expression: &str) -> Result<Self, FilterError> {
        let mut chain = Vec::new();
        for entry in expression.split(',') {
            let trimmed = entry.trim();
            let mut chars = trimmed.chars();
            let Some(prefix) = chars.next() else {
                continue;
            };
            let pattern = chars.as_str();
            let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                FilterError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                }
            })?;
            match prefix {
                '+' => chain.push(Rule::Include(regex)),
                '-' => chain.push(Rule::Exclude(regex)),
                _ => return Err(FilterError::InvalidPrefix(trimmed.to_string())),
            }
        }
        Ok(Self { chain })
    }

    /// Resource path form (`com/acme/Foo.class`) is normalized before testing.
    pub fn accepts_resource(&self, resource_path: &str) -> bool {
        self.accepts(&resource_path.replace('/', "."))
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut accept = matches!(self.chain.first(), None | Some(Rule::Exclude(_)));
        for rule in &self.chain {
            match rule {
                Rule::Include(_) if accept => continue,
                Rule::Exclude(_) if !accept => continue,
                Rule::Include(regex) => accept = regex.is_match(input),
                Rule::Exclude(regex) => {
                    accept = !regex.is_match(input);
                    // first rejecting exclude wins
                    if !accept {
                        break;
                    }
                }
            }
        }
        accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = InputFilter::parse("").unwrap();
        assert!(filter.accepts("com.acme.Foo.class"));
        assert!(InputFilter::accept_all().accepts("java.lang.Object.class"));
    }

    #[test]
    fn test_default_filter() {
        let filter = InputFilter::parse(DEFAULT_INCLUDE_EXCLUDE).unwrap();
        assert!(filter.accepts_resource("com/acme/controller/Home.class"));
        assert!(!filter.accepts_resource("java/lang/Object.class"));
        assert!(!filter.accepts_resource("com/sun/Internal.class"));
        // the leading javax exclusion stops the walk before the include is consulted
        assert!(!filter.accepts_resource("javax/servlet/http/HttpServlet.class"));
    }

    #[test]
    fn test_include_first_rejects_unmatched() {
        let filter = InputFilter::parse(r"+com\.acme\..*, -com\.acme\.internal\..*").unwrap();
        assert!(filter.accepts("com.acme.Web.class"));
        assert!(!filter.accepts("com.acme.internal.Secret.class"));
        assert!(!filter.accepts("org.other.Thing.class"));
    }

    #[test]
    fn test_pattern_must_match_whole_input() {
        let filter = InputFilter::parse(r"-java").unwrap();
        assert!(filter.accepts("java.lang.Object.class"));
        assert!(!filter.accepts("java"));
    }

    #[test]
    fn test_invalid_entries() {
        assert_eq!(
            InputFilter::parse("com.acme").unwrap_err(),
            FilterError::InvalidPrefix("com.acme".to_string())
        );
        assert!(matches!(
            InputFilter::parse("+(unclosed").unwrap_err(),
            FilterError::InvalidPattern { .. }
        ));
    }
}
