//! Release Descriptor Format
//!
//! Defines the JSON descriptor written next to a build artifact. The field
//! names and their order are fixed because downstream pipeline steps read the
//! file by key; all values are strings.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Indentation used for descriptor files
pub const DESCRIPTOR_INDENT: &[u8] = b"   ";

/// File mode for newly created descriptor files (rw-r--r--)
pub const DESCRIPTOR_FILE_MODE: u32 = 0o644;

/// Release metadata for a single build artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Release timestamp
    #[serde(rename = "ReleaseDate")]
    pub release_date: String,

    /// Uppercase hex MD5 digest of the artifact
    #[serde(rename = "MD5_Hash")]
    pub md5_hash: String,

    /// First dot-separated segment of the version
    #[serde(rename = "Major_Version")]
    pub major_version: String,

    /// Everything after the first dot of the version
    #[serde(rename = "Minor_Version")]
    pub minor_version: String,

    #[serde(rename = "Build_Number")]
    pub build_number: String,

    /// Base name of the artifact
    #[serde(rename = "File_Name")]
    pub file_name: String,
}

/// Errors for descriptor operations
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write descriptor {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read descriptor {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReleaseDescriptor {
    /// Serialize to the indented on-disk representation
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, DescriptorError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(DESCRIPTOR_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, DescriptorError> {
        let bytes = self.to_json_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to file, creating or truncating it
    ///
    /// New files are created with mode 0644 on unix (before umask). An
    /// existing file keeps its permissions.
    pub fn write_to_file(&self, path: &Path) -> Result<(), DescriptorError> {
        let bytes = self.to_json_bytes()?;
        let write_err = |source: io::Error| DescriptorError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(DESCRIPTOR_FILE_MODE);
        }

        let mut file = options.open(path).map_err(write_err)?;
        file.write_all(&bytes).map_err(write_err)?;
        file.flush().map_err(write_err)
    }

    /// Load from file
    pub fn from_file(path: &Path) -> Result<Self, DescriptorError> {
        let json = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Human-readable echo of every field, one per line
    pub fn echo_lines(&self) -> Vec<String> {
        vec![
            format!("Major Version: {}", self.major_version),
            format!("Minor version: {}", self.minor_version),
            format!("Build Number: {}", self.build_number),
            format!("MD5 hash: {}", self.md5_hash),
            format!("Release date: {}", self.release_date),
            format!("Filename: {}", self.file_name),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ReleaseDescriptor {
        ReleaseDescriptor {
            release_date: "2023-12-25T10:30:00.000Z".to_string(),
            md5_hash: "900150983CD24FB0D6963F7D28E17F72".to_string(),
            major_version: "2".to_string(),
            minor_version: "0.1".to_string(),
            build_number: "42".to_string(),
            file_name: "app.ipa".to_string(),
        }
    }

    #[test]
    fn test_json_layout() {
        let json = sample().to_json().unwrap();
        let expected = "{\n   \"ReleaseDate\": \"2023-12-25T10:30:00.000Z\",\n   \"MD5_Hash\": \"900150983CD24FB0D6963F7D28E17F72\",\n   \"Major_Version\": \"2\",\n   \"Minor_Version\": \"0.1\",\n   \"Build_Number\": \"42\",\n   \"File_Name\": \"app.ipa\"\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_roundtrip() {
        let descriptor = sample();
        let parsed = ReleaseDescriptor::from_json(&descriptor.to_json().unwrap()).unwrap();
        assert_eq!(parsed, descriptor);
    }

    #[test]
    fn test_empty_minor_version_is_kept() {
        let mut descriptor = sample();
        descriptor.minor_version = String::new();
        let json = descriptor.to_json().unwrap();
        assert!(json.contains("\"Minor_Version\": \"\""));
    }

    #[test]
    fn test_markup_characters_written_literally() {
        let mut descriptor = sample();
        descriptor.file_name = "a&b<c>.zip".to_string();
        let json = descriptor.to_json().unwrap();
        assert!(json.contains("\"File_Name\": \"a&b<c>.zip\""));
        assert_eq!(ReleaseDescriptor::from_json(&json).unwrap(), descriptor);
    }

    #[test]
    fn test_from_json_rejects_missing_field() {
        let err = ReleaseDescriptor::from_json(r#"{"ReleaseDate": "x"}"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Serialization(_)));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("release.json");

        let descriptor = sample();
        descriptor.write_to_file(&path).unwrap();

        let loaded = ReleaseDescriptor::from_file(&path).unwrap();
        assert_eq!(loaded, descriptor);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("release.json");
        fs::write(&path, "x".repeat(4096)).unwrap();

        sample().write_to_file(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, sample().to_json().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("release.json");
        sample().write_to_file(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        // umask may only clear bits
        assert_eq!(mode & !DESCRIPTOR_FILE_MODE, 0);
        assert_ne!(mode & 0o600, 0);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("release.json");

        let err = sample().write_to_file(&path).unwrap_err();
        assert!(matches!(err, DescriptorError::Write { .. }));
        assert!(err.to_string().contains("release.json"));
    }

    #[test]
    fn test_echo_lines() {
        let lines = sample().echo_lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Major Version: 2");
        assert_eq!(lines[1], "Minor version: 0.1");
        assert_eq!(lines[3], "MD5 hash: 900150983CD24FB0D6963F7D28E17F72");
        assert_eq!(lines[5], "Filename: app.ipa");
    }
}
