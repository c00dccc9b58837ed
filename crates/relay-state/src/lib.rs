mod error;
mod state;

pub use error::{Result, StateError};
pub use state::PublishState;
