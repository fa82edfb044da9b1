//! Output assembly: metadata encoding and artifact export

pub mod metadata;
pub mod writer;

pub use metadata::MetadataDocument;
pub use writer::{export_artifacts, write_metadata, ExportPaths};
