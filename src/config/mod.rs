//! Pipeline step configuration
//!
//! The step is configured through environment variables set by the CI
//! runner. Values are read once into a [`StampConfig`] which is then passed
//! explicitly to every later stage.

mod loader;
mod validate;

pub use loader::{
    StampConfig, ENV_BUILD_NUMBER, ENV_DESTINATION_PATH, ENV_FILE_PATH, ENV_SKIP_RELEASE_DATE,
    ENV_VERSION,
};
pub use validate::ConfigError;
