//! Host capabilities and shared helpers.

pub mod checksum;
pub mod fs;
pub mod http;
pub mod process;
