//! Version string splitting

/// Major/minor parts of a dotted version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParts {
    pub major: String,
    /// Everything after the first dot, verbatim (may itself contain dots)
    pub minor: String,
}

impl VersionParts {
    /// Split on the first `.`; `minor` is empty when there is no dot
    pub fn split(version: &str) -> Self {
        match version.split_once('.') {
            Some((major, minor)) => Self {
                major: major.to_string(),
                minor: minor.to_string(),
            },
            None => Self {
                major: version.to_string(),
                minor: String::new(),
            },
        }
    }
}
