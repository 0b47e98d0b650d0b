use crate::error::Result;
use ristretto_classfile::attributes::{Annotation, AnnotationElement};
use ristretto_classfile::{BaseType, ClassFile, FieldType};
use webmap_core::model::{AnnotationValue, DeclaredAnnotation};

/// Converts field descriptors into Java source names.
pub struct JavaTypeConverter;

impl JavaTypeConverter {
    /// `Ljava/lang/String;` -> `java.lang.String`, `[I` -> `int[]`, `V` -> `void`.
    pub fn convert_descriptor(descriptor: &str) -> Result<String> {
        let method_descriptor = format!("(){descriptor}");
        let (_, ret) = FieldType::parse_method_descriptor(&method_descriptor)?;
        Ok(match ret {
            None => "void".to_string(),
            Some(field_type) => Self::convert_type(&field_type),
        })
    }

    pub fn convert_type(ty: &FieldType) -> String {
        match ty {
            FieldType::Base(BaseType::Byte) => "byte".to_string(),
            FieldType::Base(BaseType::Char) => "char".to_string(),
            FieldType::Base(BaseType::Double) => "double".to_string(),
            FieldType::Base(BaseType::Float) => "float".to_string(),
            FieldType::Base(BaseType::Int) => "int".to_string(),
            FieldType::Base(BaseType::Long) => "long".to_string(),
            FieldType::Base(BaseType::Short) => "short".to_string(),
            FieldType::Base(BaseType::Boolean) => "boolean".to_string(),
            FieldType::Object(name) => name.replace('/', "."),
            FieldType::Array(component) => format!("{}[]", Self::convert_type(component)),
        }
    }

    /// Internal class name (`a/b/Outer$Inner`) to binary name (`a.b.Outer$Inner`).
    pub fn binary_name(internal: &str) -> String {
        internal.replace('/', ".")
    }
}

/// Turns the annotation attributes of one class into model values.
pub struct AnnotationConverter<'a> {
    class: &'a ClassFile,
}

impl<'a> AnnotationConverter<'a> {
    pub fn new(class: &'a ClassFile) -> Self {
        Self { class }
    }

    pub fn convert_annotation(&self, annotation: &Annotation) -> Result<DeclaredAnnotation> {
        let pool = &self.class.constant_pool;
        let descriptor = pool.try_get_utf8(annotation.type_index)?;
        let type_name = JavaTypeConverter::convert_descriptor(descriptor)?;

        let mut members = Vec::with_capacity(annotation.elements.len());
        for pair in &annotation.elements {
            let name = pool.try_get_utf8(pair.name_index)?.to_string();
            members.push((name, self.convert_element(&pair.value)?));
        }

        Ok(DeclaredAnnotation { type_name, members })
    }

    pub fn convert_element(&self, element: &AnnotationElement) -> Result<AnnotationValue> {
        let pool = &self.class.constant_pool;
        let value = match element {
            AnnotationElement::String { const_value_index } => {
                AnnotationValue::Text(pool.try_get_utf8(*const_value_index)?.to_string())
            }
            AnnotationElement::Class { class_info_index } => AnnotationValue::TypeRef(
                JavaTypeConverter::convert_descriptor(pool.try_get_utf8(*class_info_index)?)?,
            ),
            AnnotationElement::Boolean { const_value_index } => {
                AnnotationValue::Boolean(!matches!(pool.try_get_integer(*const_value_index)?, 0))
            }
            AnnotationElement::Enum {
                type_name_index,
                const_name_index,
            } => AnnotationValue::EnumConstant {
                type_name: JavaTypeConverter::convert_descriptor(
                    pool.try_get_utf8(*type_name_index)?,
                )?,
                constant: pool.try_get_utf8(*const_name_index)?.to_string(),
            },
            AnnotationElement::Array { values } => AnnotationValue::Array(
                values
                    .iter()
                    .map(|v| self.convert_element(v))
                    .collect::<Result<Vec<_>>>()?,
            ),
            // numbers, chars and nested annotations are not recorded
            other => AnnotationValue::Unsupported(format!("{other:?}")),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_descriptor() {
        assert_eq!(
            JavaTypeConverter::convert_descriptor("Ljava/lang/String;").unwrap(),
            "java.lang.String"
        );
        assert_eq!(JavaTypeConverter::convert_descriptor("I").unwrap(), "int");
        assert_eq!(JavaTypeConverter::convert_descriptor("V").unwrap(), "void");
        assert_eq!(
            JavaTypeConverter::convert_descriptor("[[Lcom/acme/Role;").unwrap(),
            "com.acme.Role[][]"
        );
        assert!(JavaTypeConverter::convert_descriptor("Q").is_err());
    }

    #[test]
    fn test_binary_name_keeps_nested_marker() {
        assert_eq!(
            JavaTypeConverter::binary_name("com/acme/Outer$Inner"),
            "com.acme.Outer$Inner"
        );
    }
}
