//! Downstream variable export
//!
//! Later pipeline steps pick values up from their environment. Publishing
//! goes through [`VariablePublisher`] so the pipeline does not depend on a
//! particular CI tool; [`EnvmanPublisher`] talks to the `envman` CLI.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

/// Key the artifact digest is exported under
pub const HASH_EXPORT_KEY: &str = "MD5_HASH";

/// Default envman executable
pub const DEFAULT_ENVMAN: &str = "envman";

/// Publisher errors
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error talking to publisher: {0}")]
    Io(#[from] io::Error),

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Capability to publish a key/value pair to later pipeline steps
pub trait VariablePublisher {
    fn publish(&self, key: &str, value: &str) -> Result<(), PublishError>;
}

impl<P: VariablePublisher + ?Sized> VariablePublisher for &P {
    fn publish(&self, key: &str, value: &str) -> Result<(), PublishError> {
        (**self).publish(key, value)
    }
}

/// Publisher that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl VariablePublisher for NoopPublisher {
    fn publish(&self, key: &str, _value: &str) -> Result<(), PublishError> {
        tracing::debug!(key, "export disabled, not publishing");
        Ok(())
    }
}

/// Publishes through `envman add --key <KEY>` with the value on stdin
#[derive(Debug, Clone)]
pub struct EnvmanPublisher {
    program: String,
}

impl EnvmanPublisher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for EnvmanPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_ENVMAN)
    }
}

impl VariablePublisher for EnvmanPublisher {
    fn publish(&self, key: &str, value: &str) -> Result<(), PublishError> {
        let mut child = Command::new(&self.program)
            .args(["add", "--key", key])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PublishError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading stdin is judged by its status
            match stdin.write_all(value.as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        } // stdin dropped here so the child sees EOF

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(PublishError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::info!(key, program = %self.program, "exported variable");
        Ok(())
    }
}
