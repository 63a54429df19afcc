//! Entity definitions for the storefront: stored records, the client-facing
//! input shapes, field validation and the sample rows used to seed a fresh
//! store.

pub mod errors;
pub mod validation;
pub mod product;
pub mod customer;

pub use customer::{Customer, CustomerInput};
pub use product::{Product, ProductInput};
pub use validation::Validate;
