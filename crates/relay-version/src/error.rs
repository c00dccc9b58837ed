use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid dependency range '{range}'")]
    InvalidRange {
        range: String,
        #[source]
        source: semver::Error,
    },
}
