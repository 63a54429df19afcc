use std::sync::Arc;

use axum::extract::FromRef;
use service::{CustomerService, ProductService};

/// Shared router state: one handle per repository service.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
    pub customers: Arc<CustomerService>,
}

impl AppState {
    pub fn new(seed: bool) -> Self {
        Self {
            products: Arc::new(ProductService::new(seed)),
            customers: Arc::new(CustomerService::new(seed)),
        }
    }
}

impl FromRef<AppState> for Arc<ProductService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.products)
    }
}

impl FromRef<AppState> for Arc<CustomerService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.customers)
    }
}
