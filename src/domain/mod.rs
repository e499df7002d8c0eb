//! Core domain types
//!
//! Pure types with no I/O dependencies beyond settings file loading. These
//! represent the core concepts of the air-quality plugin.

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::*;
pub use error::*;
pub use types::*;
pub use validate::*;
