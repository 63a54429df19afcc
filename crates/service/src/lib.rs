//! Service layer providing the storefront's repository operations.
//! - Each service owns an in-memory, soft-delete store behind a lock.
//! - Validation rules come from the `models` crate; services report failures
//!   as [`errors::ServiceError`].
//! - [`entity::EntityService`] is the seam the HTTP layer is generic over.

pub mod errors;
pub mod storage;
pub mod entity;
pub mod product_service;
pub mod customer_service;

pub use customer_service::CustomerService;
pub use entity::EntityService;
pub use product_service::ProductService;
