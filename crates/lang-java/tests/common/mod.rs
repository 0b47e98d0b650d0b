//! Minimal class file assembler for tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Element value as written into an annotation.
#[allow(dead_code)]
pub enum Element {
    Str(&'static str),
    Bool(bool),
    Int(i32),
    Enum(&'static str, &'static str),
    Class(&'static str),
    Array(Vec<Element>),
}

pub struct ClassBuilder {
    pool: Vec<Vec<u8>>,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<(String, Vec<(String, Element)>)>,
}

#[allow(dead_code)]
impl ClassBuilder {
    /// `name` uses internal form, e.g. `com/acme/controller/Home`.
    pub fn new(name: &str) -> Self {
        Self {
            pool: Vec::new(),
            this_class: name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn extends(mut self, name: &str) -> Self {
        self.super_class = Some(name.to_string());
        self
    }

    pub fn no_super(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    /// `descriptor` is the annotation type descriptor, e.g. `Lcom/acme/UrlPattern;`.
    pub fn annotate(mut self, descriptor: &str, members: Vec<(&str, Element)>) -> Self {
        self.annotations.push((
            descriptor.to_string(),
            members
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        ));
        self
    }

    fn add(&mut self, entry: Vec<u8>) -> u16 {
        if let Some(pos) = self.pool.iter().position(|e| *e == entry) {
            return (pos + 1) as u16;
        }
        self.pool.push(entry);
        self.pool.len() as u16
    }

    fn utf8(&mut self, text: &str) -> u16 {
        let mut entry = vec![1u8];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.add(entry)
    }

    fn integer(&mut self, value: i32) -> u16 {
        let mut entry = vec![3u8];
        entry.extend_from_slice(&value.to_be_bytes());
        self.add(entry)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut entry = vec![7u8];
        entry.extend_from_slice(&name_index.to_be_bytes());
        self.add(entry)
    }

    fn element(&mut self, value: &Element, out: &mut Vec<u8>) {
        match value {
            Element::Str(text) => {
                out.push(b's');
                let idx = self.utf8(text);
                out.extend_from_slice(&idx.to_be_bytes());
            }
            Element::Bool(flag) => {
                out.push(b'Z');
                let idx = self.integer(i32::from(*flag));
                out.extend_from_slice(&idx.to_be_bytes());
            }
            Element::Int(n) => {
                out.push(b'I');
                let idx = self.integer(*n);
                out.extend_from_slice(&idx.to_be_bytes());
            }
            Element::Enum(type_descriptor, constant) => {
                out.push(b'e');
                let type_idx = self.utf8(type_descriptor);
                let const_idx = self.utf8(constant);
                out.extend_from_slice(&type_idx.to_be_bytes());
                out.extend_from_slice(&const_idx.to_be_bytes());
            }
            Element::Class(descriptor) => {
                out.push(b'c');
                let idx = self.utf8(descriptor);
                out.extend_from_slice(&idx.to_be_bytes());
            }
            Element::Array(values) => {
                out.push(b'[');
                out.extend_from_slice(&(values.len() as u16).to_be_bytes());
                for v in values {
                    self.element(v, out);
                }
            }
        }
    }

    pub fn build(mut self) -> Vec<u8> {
        let this_name = self.this_class.clone();
        let this_idx = self.class(&this_name);
        let super_idx = match self.super_class.clone() {
            Some(name) => self.class(&name),
            None => 0,
        };
        let interfaces: Vec<String> = self.interfaces.clone();
        let interface_idx: Vec<u16> = interfaces.iter().map(|i| self.class(i)).collect();

        let annotations = std::mem::take(&mut self.annotations);
        let mut attribute = Vec::new();
        let attribute_name = if annotations.is_empty() {
            None
        } else {
            let name_idx = self.utf8("RuntimeVisibleAnnotations");
            attribute.extend_from_slice(&(annotations.len() as u16).to_be_bytes());
            for (descriptor, members) in &annotations {
                let type_idx = self.utf8(descriptor);
                attribute.extend_from_slice(&type_idx.to_be_bytes());
                attribute.extend_from_slice(&(members.len() as u16).to_be_bytes());
                for (name, value) in members {
                    let member_idx = self.utf8(name);
                    attribute.extend_from_slice(&member_idx.to_be_bytes());
                    self.element(value, &mut attribute);
                }
            }
            Some(name_idx)
        };

        let mut out = vec![0xCA, 0xFE, 0xBA, 0xBE];
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&52u16.to_be_bytes()); // major: Java 8
        out.extend_from_slice(&((self.pool.len() + 1) as u16).to_be_bytes());
        for entry in &self.pool {
            out.extend_from_slice(entry);
        }
        out.extend_from_slice(&0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
        out.extend_from_slice(&this_idx.to_be_bytes());
        out.extend_from_slice(&super_idx.to_be_bytes());
        out.extend_from_slice(&(interface_idx.len() as u16).to_be_bytes());
        for idx in interface_idx {
            out.extend_from_slice(&idx.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes()); // fields
        out.extend_from_slice(&0u16.to_be_bytes()); // methods
        match attribute_name {
            Some(name_idx) => {
                out.extend_from_slice(&1u16.to_be_bytes());
                out.extend_from_slice(&name_idx.to_be_bytes());
                out.extend_from_slice(&(attribute.len() as u32).to_be_bytes());
                out.extend_from_slice(&attribute);
            }
            None => out.extend_from_slice(&0u16.to_be_bytes()),
        }
        out
    }
}

/// Writes `classes` (internal name, bytes) into a jar at `path`.
#[allow(dead_code)]
pub fn write_jar(path: &Path, classes: &[(&str, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, bytes) in classes {
        zip.start_file(
            format!("{name}.class"),
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// Writes `classes` as loose files below `root`.
#[allow(dead_code)]
pub fn write_class_dir(root: &Path, classes: &[(&str, Vec<u8>)]) {
    for (name, bytes) in classes {
        let path = root.join(format!("{name}.class"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }
}
