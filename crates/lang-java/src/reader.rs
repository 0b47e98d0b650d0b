//! Reads class entries out of class directories, jar archives and loose class files.

use crate::classfile::{CLASS_MAGIC, parse_class};
use crate::error::{ReadError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;
use webmap_core::filter::InputFilter;
use webmap_core::scan::{ArtifactScan, BoxError, ClassReader};
use zip::ZipArchive;

pub struct JavaClassReader;

impl JavaClassReader {
    /// Class entries worth parsing; module descriptors and versioned `META-INF`
    /// copies are skipped.
    fn is_class_resource(name: &str) -> bool {
        name.ends_with(".class")
            && !name.starts_with("META-INF/")
            && !name.ends_with("module-info.class")
    }

    fn accept(scan: &mut ArtifactScan, resource: &str, bytes: Vec<u8>) {
        match parse_class(bytes) {
            Ok(record) => scan.records.push(record),
            Err(e) => {
                warn!("Failed to parse {}: {}", resource, e);
                scan.failed_entries += 1;
            }
        }
    }

    pub fn read_directory(&self, root: &Path, filter: &InputFilter) -> Result<ArtifactScan> {
        let mut scan = ArtifactScan::default();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let resource = relative.to_string_lossy().replace('\\', "/");
            if !Self::is_class_resource(&resource) {
                continue;
            }
            if !filter.accepts_resource(&resource) {
                scan.filtered_entries += 1;
                continue;
            }
            match std::fs::read(entry.path()) {
                Ok(bytes) => Self::accept(&mut scan, &resource, bytes),
                Err(e) => {
                    warn!("Failed to read {:?}: {}", entry.path(), e);
                    scan.failed_entries += 1;
                }
            }
        }
        Ok(scan)
    }

    pub fn read_jar(&self, file: File, filter: &InputFilter) -> Result<ArtifactScan> {
        let mut archive = ZipArchive::new(file)?;
        let mut scan = ArtifactScan::default();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let resource = entry.name().to_string();
            if !Self::is_class_resource(&resource) {
                continue;
            }
            if !filter.accepts_resource(&resource) {
                scan.filtered_entries += 1;
                continue;
            }
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                warn!("Failed to inflate {}: {}", resource, e);
                scan.failed_entries += 1;
                continue;
            }
            Self::accept(&mut scan, &resource, bytes);
        }
        Ok(scan)
    }

    /// A loose class file has no known root, so the filter is applied to the
    /// parsed class name instead of its path.
    pub fn read_class_file(&self, mut file: File, filter: &InputFilter) -> Result<ArtifactScan> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let record = parse_class(bytes)?;
        let mut scan = ArtifactScan::default();
        if filter.accepts(&format!("{}.class", record.descriptor.name)) {
            scan.records.push(record);
        } else {
            scan.filtered_entries += 1;
        }
        Ok(scan)
    }

    pub fn read_artifact(&self, artifact: &Path, filter: &InputFilter) -> Result<ArtifactScan> {
        if artifact.is_dir() {
            return self.read_directory(artifact, filter);
        }

        // Detect format via magic bytes
        let mut file = File::open(artifact)?;
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        file.seek(SeekFrom::Start(0))?;

        match magic {
            // ZIP local header or empty archive
            [0x50, 0x4B, _, _] => self.read_jar(file, filter),
            CLASS_MAGIC => self.read_class_file(file, filter),
            _ => Err(ReadError::UnknownFormat(artifact.display().to_string())),
        }
    }
}

impl ClassReader for JavaClassReader {
    fn can_read(&self, artifact: &Path) -> bool {
        if artifact.is_dir() {
            return true;
        }
        let ext = artifact
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ext == "jar" || ext == "zip" || ext == "class"
    }

    fn read(
        &self,
        artifact: &Path,
        filter: &InputFilter,
    ) -> std::result::Result<ArtifactScan, BoxError> {
        Ok(self.read_artifact(artifact, filter)?)
    }
}
