//! Shared building blocks used by every layer of the storefront service:
//! the JSON response envelope and logging setup.

pub mod types;
pub mod utils;
