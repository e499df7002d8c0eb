//! Adapters: implementations of the port traits

pub mod json_store;
pub mod memory_store;
pub mod serial_port;
