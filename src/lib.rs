//! Release Stamp - release metadata for build artifacts
//!
//! This crate implements a build pipeline step that hashes an artifact,
//! resolves a release date and writes a JSON release descriptor for
//! downstream steps.

pub mod config;
pub mod digest;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod release_date;
pub mod version;

pub use config::{ConfigError, StampConfig};
pub use pipeline::{ExportPolicy, PipelineError, PipelineOptions, StampOutcome, StampPipeline};
pub use publish::{EnvmanPublisher, NoopPublisher, VariablePublisher, HASH_EXPORT_KEY};
pub use release_date::{Clock, ReleaseDateResolver, SystemClock};
pub use stamp_descriptor::ReleaseDescriptor;
