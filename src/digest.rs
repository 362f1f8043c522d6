//! Artifact content digest
//!
//! MD5 over the full file contents, streamed in fixed-size chunks and
//! rendered as 32 uppercase hex characters.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Read buffer size for hashing
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors while hashing an artifact
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Hash everything readable from `reader`
pub fn md5_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode_upper(hasher.finalize()))
}

/// Hash the file at `path`
///
/// The file handle is dropped before returning, on success and on error.
pub fn md5_file(path: &Path) -> Result<String, DigestError> {
    let file = File::open(path).map_err(|source| DigestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    md5_reader(file).map_err(|source| DigestError::Read {
        path: path.to_path_buf(),
        source,
    })
}
