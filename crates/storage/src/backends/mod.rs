//! KV store backends.

pub mod consul;
pub mod memory;
