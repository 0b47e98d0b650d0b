//! Class file parsing.
//!
//! Only the constant pool, the type hierarchy entries and the class-level
//! `RuntimeVisibleAnnotations` attribute are looked at. Nothing is loaded or run.

use crate::error::Result;
use ristretto_classfile::ClassFile;
use ristretto_classfile::attributes::Attribute;
use std::io::Cursor;
use webmap_core::model::{ClassRecord, TypeDescriptor};

mod converter;
pub use converter::{AnnotationConverter, JavaTypeConverter};

pub const CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

pub fn parse_class(bytes: Vec<u8>) -> Result<ClassRecord> {
    let class = ClassFile::from_bytes(&mut Cursor::new(bytes))?;
    let pool = &class.constant_pool;

    let name = JavaTypeConverter::binary_name(pool.try_get_class(class.this_class)?);

    let mut supertypes = Vec::with_capacity(class.interfaces.len() + 1);
    // java.lang.Object has no superclass entry
    if class.super_class != 0 {
        supertypes.push(JavaTypeConverter::binary_name(
            pool.try_get_class(class.super_class)?,
        ));
    }
    for interface in &class.interfaces {
        supertypes.push(JavaTypeConverter::binary_name(pool.try_get_class(*interface)?));
    }

    let converter = AnnotationConverter::new(&class);
    let mut annotations = Vec::new();
    for attribute in &class.attributes {
        if let Attribute::RuntimeVisibleAnnotations {
            annotations: declared,
            ..
        } = attribute
        {
            for annotation in declared {
                annotations.push(converter.convert_annotation(annotation)?);
            }
        }
    }

    Ok(ClassRecord {
        descriptor: TypeDescriptor::new(name, supertypes),
        annotations,
    })
}
