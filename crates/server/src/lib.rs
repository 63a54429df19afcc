//! HTTP surface of the storefront: routing, the response envelope and fault
//! mapping, request logging and metrics.

pub mod errors;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{build_app, run};
pub use state::AppState;
