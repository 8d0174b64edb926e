//! Parameter and result types for the supported API calls.

pub mod access_mode;
pub mod archive;
pub mod upload;
pub mod usage;
