//! Utilities module

pub mod error;
pub mod logging;
