use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in '{path}'")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in '{path}'")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported file format for '{path}' (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to start resolver thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Renders an error and its sources on one line, outermost first.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_includes_path_and_source() {
        let err = SnapshotError::Read {
            path: PathBuf::from("/repos/app/relay.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        let chain = error_chain(&err);

        assert_eq!(chain, "failed to read '/repos/app/relay.json': no such file");
    }

    #[test]
    fn unsupported_format_names_expected_extensions() {
        let err = SnapshotError::UnsupportedFormat {
            path: PathBuf::from("snapshot.yaml"),
        };

        let msg = err.to_string();

        assert!(msg.contains("snapshot.yaml"));
        assert!(msg.contains(".json or .toml"));
    }
}
