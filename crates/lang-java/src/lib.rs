//! Compiled-class reader for the route scanner.
//!
//! Parses class files with `ristretto_classfile` and feeds them to
//! [`webmap_core::scan::Scanner`] through the [`ClassReader`](webmap_core::ClassReader) seam.

pub mod classfile;
pub mod error;
mod reader;

pub use classfile::parse_class;
pub use error::ReadError;
pub use reader::JavaClassReader;
