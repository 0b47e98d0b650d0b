//! Owner-qualified annotation values, flattened to plain strings.

use crate::model::AnnotationValue;
use std::collections::HashMap;
use tracing::warn;

/// `(owner type, annotation type)` pair, both fully qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationKey {
    pub owner: String,
    pub annotation: String,
}

impl AnnotationKey {
    pub fn new(owner: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            annotation: annotation.into(),
        }
    }
}

/// Ordered multiset of scalar tokens per key. Insertion order is discovery
/// order and duplicates are kept.
#[derive(Debug, Default, Clone)]
pub struct AnnotationStore {
    entries: HashMap<AnnotationKey, Vec<String>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens `value` depth-first and appends every scalar under the key.
    ///
    /// Returns the number of tokens appended. Unsupported value kinds are logged
    /// and dropped without affecting their siblings.
    pub fn record_annotation(
        &mut self,
        owner: &str,
        annotation: &str,
        value: &AnnotationValue,
    ) -> usize {
        let mut tokens = Vec::new();
        flatten_into(owner, annotation, value, &mut tokens);
        let appended = tokens.len();
        if appended > 0 {
            self.entries
                .entry(AnnotationKey::new(owner, annotation))
                .or_default()
                .extend(tokens);
        }
        appended
    }

    pub fn values_for(&self, owner: &str, annotation: &str) -> &[String] {
        self.entries
            .get(&AnnotationKey::new(owner, annotation))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Appends every sequence of `other` after this store's values for the same key.
    pub fn merge(&mut self, other: AnnotationStore) {
        for (key, values) in other.entries {
            self.entries.entry(key).or_default().extend(values);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(owner: &str, annotation: &str, value: &AnnotationValue, out: &mut Vec<String>) {
    match value {
        AnnotationValue::Text(text) => out.push(text.clone()),
        AnnotationValue::TypeRef(type_name) => out.push(type_name.clone()),
        AnnotationValue::Boolean(flag) => out.push(flag.to_string()),
        AnnotationValue::EnumConstant { constant, .. } => out.push(constant.clone()),
        AnnotationValue::Array(elements) => {
            for element in elements {
                flatten_into(owner, annotation, element, out);
            }
        }
        AnnotationValue::Unsupported(description) => {
            warn!(
                "Skipping unsupported value {} of @{} on {}",
                description, annotation, owner
            );
        }
    }
}
