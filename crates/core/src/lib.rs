pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod index;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod scan;
pub mod splice;
pub mod store;

pub use config::WebMapConfig;
pub use driver::{Driver, RunSummary, Tally, Target};
pub use error::{Result, WebMapError};
pub use scan::{ArtifactScan, BoxError, ClassReader};
