use thiserror::Error;

/// Failures that abort planning altogether.
///
/// Everything recoverable is reported as a [`crate::PlanIssue`] on the plan
/// instead.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("duplicate package name '{name}' in snapshot")]
    DuplicatePackageName { name: String },
}

pub type Result<T> = std::result::Result<T, PlanError>;
