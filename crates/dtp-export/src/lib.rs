//! Platform export and the build pipeline.
//!
//! # Modules
//!
//! - [`sink`] — [`TokenSink`], with [`FsSink`] and [`InMemorySink`]
//! - [`exporter`] — Platform filtering, provenance comments, artifact locations
//! - [`build`] — [`BuildPipeline`]: combine, clean, normalize, export

pub mod build;
pub mod error;
pub mod exporter;
pub mod sink;

pub use build::{BuildPipeline, BuildReport};
pub use error::{ExportError, ExportResult};
pub use exporter::{
    artifact_location, filter_platform, with_provenance, Artifact, PlatformExporter,
    DEPRECATED_DESCRIPTION, GENERATED_COMMENT,
};
pub use sink::{FsSink, InMemorySink, TokenSink};
