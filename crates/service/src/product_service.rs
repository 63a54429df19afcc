use chrono::{DateTime, Utc};
use models::product::sample_products;
use models::{Product, ProductInput, Validate};
use tracing::{debug, info};

use crate::entity::{needle, EntityService};
use crate::errors::ServiceError;
use crate::storage::{MemoryStore, Record};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

impl Record for Product {
    fn id(&self) -> i32 {
        self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

/// Product repository backed by a process-local [`MemoryStore`].
pub struct ProductService {
    store: MemoryStore<Product>,
}

impl Default for ProductService {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProductService {
    /// Create the service, optionally seeded with the sample catalog.
    pub fn new(seed: bool) -> Self {
        let svc = Self { store: MemoryStore::new() };
        if seed {
            let now = Utc::now();
            for input in sample_products() {
                // a fresh store cannot exhaust the id sequence
                let _ = svc.store.insert(|id| Product::from_input(id, input, now));
            }
            debug!(count = svc.store.len(), "seeded product store");
        }
        svc
    }

    /// Active products whose category equals `category`, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.store.filter_active(|p| p.in_category(category))
    }

    /// Active products with `stock_quantity < threshold`.
    pub fn low_stock(&self, threshold: i32) -> Vec<Product> {
        self.store.filter_active(|p| p.stock_quantity < threshold)
    }

    pub fn next_id(&self) -> i32 {
        self.store.peek_next_id()
    }
}

impl EntityService for ProductService {
    type Record = Product;
    type Input = ProductInput;

    fn list_all(&self) -> Vec<Product> {
        self.store.list_active()
    }

    fn get_by_id(&self, id: i32) -> Option<Product> {
        self.store.get_active(id)
    }

    fn search(&self, term: &str) -> Vec<Product> {
        match needle(term) {
            None => self.list_all(),
            Some(n) => self.store.filter_active(|p| p.mentions(&n)),
        }
    }

    fn create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let product = self.store.insert(|id| Product::from_input(id, input, now))?;
        info!(id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    fn update(&self, id: i32, input: ProductInput) -> Result<Option<Product>, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let updated = self.store.update_active_if(id, |_| Ok(()), |p| p.apply(input, now))?;
        if updated.is_some() {
            info!(id, "product updated");
        }
        Ok(updated)
    }

    fn delete(&self, id: i32) -> bool {
        let removed = self.store.deactivate(id, Utc::now());
        if removed {
            info!(id, "product deactivated");
        }
        removed
    }
}
