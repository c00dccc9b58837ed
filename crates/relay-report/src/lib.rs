//! Renders publish plans for people and for tools.
//!
//! Output depends only on its inputs: every collection rendered is ordered,
//! so the same snapshot always yields byte-identical reports.

mod error;
mod formatter;
mod json;
mod markdown;
mod sections;

pub use error::{ReportError, Result};
pub use formatter::{AnalyzeFormatter, PreviewFormatter};
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
