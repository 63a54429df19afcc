use chrono::{DateTime, Utc};
use models::customer::sample_customers;
use models::{Customer, CustomerInput, Validate};
use tracing::{debug, info};

use crate::entity::{needle, EntityService};
use crate::errors::ServiceError;
use crate::storage::{MemoryStore, Record};

pub const EMAIL_IN_USE: &str = "Email address is already in use";

impl Record for Customer {
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

/// True when no active row other than `exclude` holds `email`.
fn email_free(rows: &[Customer], email: &str, exclude: Option<i32>) -> bool {
    !rows
        .iter()
        .any(|c| c.is_active && c.has_email(email) && Some(c.id) != exclude)
}

/// Customer repository. Email uniqueness among active customers is checked
/// under the store's write lock, so two concurrent creates cannot both claim
/// the same address.
pub struct CustomerService {
    store: MemoryStore<Customer>,
}

impl Default for CustomerService {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CustomerService {
    pub fn new(seed: bool) -> Self {
        let svc = Self { store: MemoryStore::new() };
        if seed {
            let now = Utc::now();
            for input in sample_customers() {
                let _ = svc.store.insert(|id| Customer::from_input(id, input, now));
            }
            debug!(count = svc.store.len(), "seeded customer store");
        }
        svc
    }

    pub fn get_by_email(&self, email: &str) -> Option<Customer> {
        self.store.find_active(|c| c.has_email(email))
    }

    /// Active customers in `country`, ignoring case. Customers without a
    /// country never match.
    pub fn by_country(&self, country: &str) -> Vec<Customer> {
        self.store.filter_active(|c| c.in_country(country))
    }

    /// Whether `email` may be used, optionally ignoring the customer being
    /// updated.
    pub fn email_available(&self, email: &str, exclude: Option<i32>) -> bool {
        self.get_by_email(email).map_or(true, |c| Some(c.id) == exclude)
    }

    pub fn next_id(&self) -> i32 {
        self.store.peek_next_id()
    }
}

impl EntityService for CustomerService {
    type Record = Customer;
    type Input = CustomerInput;

    fn list_all(&self) -> Vec<Customer> {
        self.store.list_active()
    }

    fn get_by_id(&self, id: i32) -> Option<Customer> {
        self.store.get_active(id)
    }

    fn search(&self, term: &str) -> Vec<Customer> {
        match needle(term) {
            None => self.list_all(),
            Some(n) => self.store.filter_active(|c| c.mentions(&n)),
        }
    }

    fn create(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let email = input.email.clone();
        let customer = self.store.insert_if(
            |rows| {
                if email_free(rows, &email, None) {
                    Ok(())
                } else {
                    Err(ServiceError::Conflict(EMAIL_IN_USE.into()))
                }
            },
            |id| Customer::from_input(id, input, now),
        )?;
        info!(id = customer.id, "customer created");
        Ok(customer)
    }

    fn update(&self, id: i32, input: CustomerInput) -> Result<Option<Customer>, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let email = input.email.clone();
        let updated = self.store.update_active_if(
            id,
            |rows| {
                if email_free(rows, &email, Some(id)) {
                    Ok(())
                } else {
                    Err(ServiceError::Conflict(EMAIL_IN_USE.into()))
                }
            },
            |c| c.apply(input, now),
        )?;
        if updated.is_some() {
            info!(id, "customer updated");
        }
        Ok(updated)
    }

    fn delete(&self, id: i32) -> bool {
        let removed = self.store.deactivate(id, Utc::now());
        if removed {
            info!(id, "customer deactivated");
        }
        removed
    }
}
