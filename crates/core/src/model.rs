//! Data extracted from compiled classes and the route mappings derived from it.

use serde::Serialize;

/// A compiled type and the names of its direct supertypes (superclass first,
/// then implemented interfaces in declaration order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub supertypes: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, supertypes: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            supertypes: supertypes.into_iter().collect(),
        }
    }
}

/// A single annotation member value as stored in the class file.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Text(String),
    /// A class literal, rendered as a Java source name (`java.lang.String`, `int[]`).
    TypeRef(String),
    Boolean(bool),
    EnumConstant {
        type_name: String,
        constant: String,
    },
    Array(Vec<AnnotationValue>),
    /// Any value kind the store does not record (numbers, chars, nested annotations).
    Unsupported(String),
}

/// A runtime-visible annotation declared on a type.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredAnnotation {
    pub type_name: String,
    pub members: Vec<(String, AnnotationValue)>,
}

impl DeclaredAnnotation {
    pub fn member(&self, name: &str) -> Option<&AnnotationValue> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| value)
    }
}

/// Everything the scan keeps from one class file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRecord {
    pub descriptor: TypeDescriptor,
    pub annotations: Vec<DeclaredAnnotation>,
}

/// Final route assignment for one handler type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMapping {
    pub type_name: String,
    pub synthetic_name: String,
    pub patterns: Vec<String>,
    pub requires_elevated_role: bool,
}

impl RouteMapping {
    pub fn synthetic_name_for(type_name: &str) -> String {
        type_name.replace('.', "_")
    }
}
