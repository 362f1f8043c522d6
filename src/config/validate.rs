//! Required field checks

use super::loader::{
    StampConfig, ENV_BUILD_NUMBER, ENV_DESTINATION_PATH, ENV_FILE_PATH, ENV_VERSION,
};

/// A required configuration value is missing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("No version specified (set version_string)")]
    MissingVersion,

    #[error("No build number specified (set build_number)")]
    MissingBuildNumber,

    #[error("No file name specified (set file_path)")]
    MissingFileName,

    #[error("No destination file path specified (set destination_path)")]
    MissingDestinationPath,
}

impl ConfigError {
    /// Environment variable that has to be set to fix this error
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::MissingVersion => ENV_VERSION,
            ConfigError::MissingBuildNumber => ENV_BUILD_NUMBER,
            ConfigError::MissingFileName => ENV_FILE_PATH,
            ConfigError::MissingDestinationPath => ENV_DESTINATION_PATH,
        }
    }
}

impl StampConfig {
    /// Check required fields, reporting only the first one missing
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::MissingVersion);
        }
        if self.build_number.is_empty() {
            return Err(ConfigError::MissingBuildNumber);
        }
        if self.file_name.is_empty() {
            return Err(ConfigError::MissingFileName);
        }
        if self.destination_path.is_empty() {
            return Err(ConfigError::MissingDestinationPath);
        }
        Ok(())
    }
}
