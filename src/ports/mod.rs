//! Port traits (interfaces)
//!
//! These traits define the boundaries between the core domain and external I/O.
//! Adapters implement these traits to connect to real storage and hardware.

pub mod serial;
pub mod store;

pub use serial::*;
pub use store::*;
