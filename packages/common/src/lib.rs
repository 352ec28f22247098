//! Shared configuration, errors and filesystem access for templar

pub mod config;
pub mod error;
pub mod filesystem;

pub use config::*;
pub use error::*;
pub use filesystem::*;
