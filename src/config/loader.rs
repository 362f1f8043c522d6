//! Environment configuration loader

use std::path::Path;

/// Dotted version identifier, e.g. `1.2.3`
pub const ENV_VERSION: &str = "version_string";

/// Opaque build identifier
pub const ENV_BUILD_NUMBER: &str = "build_number";

/// Path of the artifact to hash
pub const ENV_FILE_PATH: &str = "file_path";

/// Where the descriptor JSON is written
pub const ENV_DESTINATION_PATH: &str = "destination_path";

/// `"true"` bypasses the interactive release date prompt
pub const ENV_SKIP_RELEASE_DATE: &str = "skip_release_date";

/// Configuration for one stamping run
///
/// No validation happens at load time: missing variables are empty strings
/// and are reported by [`StampConfig::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampConfig {
    pub version: String,
    pub build_number: String,
    pub file_path: String,
    /// Base name of `file_path`
    pub file_name: String,
    pub destination_path: String,
    pub skip_release_date: String,
}

impl StampConfig {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();

        let file_path = get(ENV_FILE_PATH);
        let file_name = base_name(&file_path);

        Self {
            version: get(ENV_VERSION),
            build_number: get(ENV_BUILD_NUMBER),
            file_path,
            file_name,
            destination_path: get(ENV_DESTINATION_PATH),
            skip_release_date: get(ENV_SKIP_RELEASE_DATE),
        }
    }

    /// Whether the release date prompt is bypassed
    pub fn skips_release_date(&self) -> bool {
        self.skip_release_date == "true"
    }

    /// Operator-facing summary of the loaded values
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "Configs:".to_string(),
            format!(" - Version: {}", self.version),
            format!(" - Build Number: {}", self.build_number),
            format!(" - File path: {}", self.file_path),
            format!(" - Filename: {}", self.file_name),
            format!(" - Destination path: {}", self.destination_path),
            format!(" - Skip release date: {}", self.skip_release_date),
        ]
    }

    /// Emit the summary through the log
    pub fn log_summary(&self) {
        for line in self.summary_lines() {
            tracing::info!("{}", line);
        }
    }
}

/// Last path segment, or empty when there is none
fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = StampConfig::from_lookup(lookup_from(&[
            (ENV_VERSION, "1.2.3"),
            (ENV_BUILD_NUMBER, "42"),
            (ENV_FILE_PATH, "/builds/out/app.ipa"),
            (ENV_DESTINATION_PATH, "/builds/out/release.json"),
            (ENV_SKIP_RELEASE_DATE, "true"),
        ]));

        assert_eq!(config.version, "1.2.3");
        assert_eq!(config.build_number, "42");
        assert_eq!(config.file_path, "/builds/out/app.ipa");
        assert_eq!(config.file_name, "app.ipa");
        assert_eq!(config.destination_path, "/builds/out/release.json");
        assert!(config.skips_release_date());
    }

    #[test]
    fn test_missing_variables_are_empty() {
        let config = StampConfig::from_lookup(|_| None);
        assert_eq!(config, StampConfig::default());
        assert!(!config.skips_release_date());
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("app.ipa"), "app.ipa");
        assert_eq!(base_name("dist/app.ipa"), "app.ipa");
        assert_eq!(base_name("dist/app/"), "app");
        assert_eq!(base_name(""), "");
        assert_eq!(base_name("dist/.."), "");
    }

    #[test]
    fn test_skip_flag_is_exact() {
        for value in ["TRUE", "1", "yes", "false", ""] {
            let config = StampConfig {
                skip_release_date: value.to_string(),
                ..Default::default()
            };
            assert!(!config.skips_release_date(), "{value:?} must not skip");
        }
    }

    #[test]
    fn test_summary_echoes_values() {
        let config = StampConfig::from_lookup(lookup_from(&[
            (ENV_VERSION, "3.1"),
            (ENV_BUILD_NUMBER, "977"),
            (ENV_FILE_PATH, "out/game.apk"),
            (ENV_SKIP_RELEASE_DATE, "false"),
        ]));

        let lines = config.summary_lines();
        assert!(lines.contains(&" - Version: 3.1".to_string()));
        assert!(lines.contains(&" - Build Number: 977".to_string()));
        assert!(lines.contains(&" - File path: out/game.apk".to_string()));
        assert!(lines.contains(&" - Filename: game.apk".to_string()));
        assert!(lines.contains(&" - Skip release date: false".to_string()));
    }
}
