//! Shared foundations for the recognizer family: fact records and the
//! snippet locator.

pub mod text;
pub mod types;

pub use types::*;
