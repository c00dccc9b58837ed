use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid version '{version}' for package '{package}'")]
    InvalidVersion {
        package: String,
        version: String,
        #[source]
        source: semver::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
