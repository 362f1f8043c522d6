//! Stamping pipeline
//!
//! Runs the step end to end:
//! - Log and validate configuration
//! - Resolve the release date
//! - Split the version and hash the artifact
//! - Echo the computed fields and write the descriptor
//! - Export the digest to later pipeline steps
//!
//! Every stage failure is fatal except the export under
//! [`ExportPolicy::BestEffort`], which only logs a warning because the
//! descriptor has already been written.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use stamp_descriptor::{DescriptorError, ReleaseDescriptor};
use thiserror::Error;

use crate::config::{ConfigError, StampConfig};
use crate::digest::{md5_file, DigestError};
use crate::publish::{PublishError, VariablePublisher, HASH_EXPORT_KEY};
use crate::release_date::{Clock, ReleaseDateError, ReleaseDateResolver, SystemClock};
use crate::version::VersionParts;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Issue with input: {0}")]
    Config(#[from] ConfigError),

    #[error("Release date error: {0}")]
    ReleaseDate(#[from] ReleaseDateError),

    #[error("Error in md5 hashing: {0}")]
    Digest(#[from] DigestError),

    #[error("Error in marshalling: {0}")]
    Serialization(serde_json::Error),

    #[error("Error writing descriptor: {0}")]
    Write(DescriptorError),

    #[error("Error writing to console: {0}")]
    Console(#[from] io::Error),

    #[error("Error exporting {key}: {source}")]
    Export {
        key: String,
        #[source]
        source: PublishError,
    },
}

impl From<DescriptorError> for PipelineError {
    fn from(e: DescriptorError) -> Self {
        match e {
            DescriptorError::Serialization(e) => PipelineError::Serialization(e),
            other => PipelineError::Write(other),
        }
    }
}

impl PipelineError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) => 1,
            _ => 2,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// What to do when the digest export fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPolicy {
    /// Log a warning and succeed
    #[default]
    BestEffort,
    /// Fail the run (after the descriptor is written)
    Required,
}

/// Run behaviour that does not come from the environment
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub export_policy: ExportPolicy,
    pub export_key: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            export_policy: ExportPolicy::BestEffort,
            export_key: HASH_EXPORT_KEY.to_string(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampOutcome {
    pub descriptor: ReleaseDescriptor,
    pub destination: PathBuf,
    /// Whether the digest reached the publisher
    pub exported: bool,
}

/// The stamping pipeline
pub struct StampPipeline<P, C = SystemClock> {
    config: StampConfig,
    options: PipelineOptions,
    publisher: P,
    clock: C,
}

impl<P: VariablePublisher> StampPipeline<P, SystemClock> {
    pub fn new(config: StampConfig, publisher: P) -> Self {
        Self::with_clock(config, publisher, SystemClock)
    }
}

impl<P: VariablePublisher, C: Clock> StampPipeline<P, C> {
    pub fn with_clock(config: StampConfig, publisher: P, clock: C) -> Self {
        Self {
            config,
            options: PipelineOptions::default(),
            publisher,
            clock,
        }
    }

    pub fn options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    /// Run every stage
    ///
    /// `input` is only read when the release date prompt is shown. Prompts
    /// and the field echo go to `output`.
    pub fn run<R, W>(&self, input: R, mut output: W) -> PipelineResult<StampOutcome>
    where
        R: BufRead,
        W: Write,
    {
        self.config.log_summary();
        self.config.validate()?;

        let release_date = ReleaseDateResolver::with_clock(&self.clock).resolve(
            self.config.skips_release_date(),
            input,
            &mut output,
        )?;

        let descriptor = self.build_descriptor(release_date)?;

        for line in descriptor.echo_lines() {
            writeln!(output, "{}", line)?;
        }
        output.flush()?;

        let destination = PathBuf::from(&self.config.destination_path);
        descriptor.write_to_file(&destination)?;
        tracing::info!(destination = %destination.display(), "wrote release descriptor");

        let exported = self.export(&descriptor.md5_hash)?;

        Ok(StampOutcome {
            descriptor,
            destination,
            exported,
        })
    }

    /// Assemble the descriptor from configuration, the artifact digest and
    /// the resolved release date
    pub fn build_descriptor(&self, release_date: String) -> PipelineResult<ReleaseDescriptor> {
        let parts = VersionParts::split(&self.config.version);
        let md5_hash = md5_file(Path::new(&self.config.file_path))?;
        tracing::debug!(file = %self.config.file_path, md5 = %md5_hash, "hashed artifact");

        Ok(ReleaseDescriptor {
            release_date,
            md5_hash,
            major_version: parts.major,
            minor_version: parts.minor,
            build_number: self.config.build_number.clone(),
            file_name: self.config.file_name.clone(),
        })
    }

    fn export(&self, md5_hash: &str) -> PipelineResult<bool> {
        let key = &self.options.export_key;
        match self.publisher.publish(key, md5_hash) {
            Ok(()) => Ok(true),
            Err(e) => match self.options.export_policy {
                ExportPolicy::BestEffort => {
                    tracing::warn!(key = %key, "export failed, continuing: {}", e);
                    Ok(false)
                }
                ExportPolicy::Required => Err(PipelineError::Export {
                    key: key.clone(),
                    source: e,
                }),
            },
        }
    }
}
