//! Data models for poolwatch

mod event;
mod outcome;

pub use event::*;
pub use outcome::*;
