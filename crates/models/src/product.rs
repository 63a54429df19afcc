use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::validation::{Validate, Violations};

/// A catalog product as stored and returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category: String,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied product fields. Server-owned fields (`id`, timestamps)
/// are ignored if present in the request body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), ModelError> {
        let mut v = Violations::new();
        v.required(&self.name, "Product name is required");
        v.max_len(&self.name, 100, "Product name cannot exceed 100 characters");
        v.optional_max_len(self.description.as_deref(), 500, "Description cannot exceed 500 characters");
        match self.price {
            None => v.push("Price is required"),
            Some(p) => v.check(p > Decimal::ZERO, "Price must be greater than 0"),
        }
        v.required(&self.category, "Category is required");
        v.max_len(&self.category, 50, "Category cannot exceed 50 characters");
        v.check(self.stock_quantity >= 0, "Stock quantity cannot be negative");
        v.finish()
    }
}

impl Product {
    /// Build a stored record from validated input.
    pub fn from_input(id: i32, input: ProductInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price.unwrap_or_default(),
            category: input.category,
            stock_quantity: input.stock_quantity,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field; `id` and `created_at` are kept.
    pub fn apply(&mut self, input: ProductInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price.unwrap_or(self.price);
        self.category = input.category;
        self.stock_quantity = input.stock_quantity;
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    /// Case-insensitive substring match on name or description.
    /// `needle` must already be lowercased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

fn sample(name: &str, description: &str, cents: i64, category: &str, stock: i32) -> ProductInput {
    ProductInput {
        name: name.into(),
        description: Some(description.into()),
        price: Some(Decimal::new(cents, 2)),
        category: category.into(),
        stock_quantity: stock,
        is_active: true,
    }
}

/// Rows a fresh product store starts with.
pub fn sample_products() -> Vec<ProductInput> {
    vec![
        sample("Laptop Pro", "High-performance laptop for professionals", 129999, "Electronics", 15),
        sample("Wireless Mouse", "Ergonomic wireless mouse with long battery life", 2999, "Electronics", 50),
        sample("Office Chair", "Comfortable ergonomic office chair", 19999, "Furniture", 8),
        sample("Coffee Maker", "Premium automatic coffee maker", 8999, "Appliances", 25),
        sample("Smartphone", "Latest smartphone with advanced features", 79999, "Electronics", 30),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> ProductInput {
        serde_json::from_value(json!({
            "name": "Widget", "price": 5.00, "category": "Tools", "stockQuantity": 3
        }))
        .unwrap()
    }

    #[test]
    fn input_defaults_and_camel_case() {
        let input = widget();
        assert_eq!(input.price, Some(Decimal::new(5, 0)));
        assert_eq!(input.stock_quantity, 3);
        assert!(input.is_active);
        assert!(input.description.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_input_reports_every_required_field() {
        let input: ProductInput = serde_json::from_value(json!({})).unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(
            err.violations(),
            [
                "Product name is required".to_string(),
                "Price is required".to_string(),
                "Category is required".to_string(),
            ]
        );
    }

    #[test]
    fn bounds_are_enforced() {
        let mut input = widget();
        input.name = "n".repeat(101);
        input.description = Some("d".repeat(501));
        input.price = Some(Decimal::ZERO);
        input.category = "c".repeat(51);
        input.stock_quantity = -1;
        let err = input.validate().unwrap_err();
        assert_eq!(err.violations().len(), 5);
        assert!(err.violations().contains(&"Price must be greater than 0".to_string()));
        assert!(err.violations().contains(&"Stock quantity cannot be negative".to_string()));
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let created = Utc::now();
        let mut p = Product::from_input(7, widget(), created);
        let mut change = widget();
        change.name = "Gadget".into();
        change.is_active = false;
        let later = created + chrono::Duration::seconds(5);
        p.apply(change, later);
        assert_eq!(p.id, 7);
        assert_eq!(p.name, "Gadget");
        assert!(!p.is_active);
        assert_eq!(p.created_at, created);
        assert_eq!(p.updated_at, later);
    }

    #[test]
    fn serializes_price_as_number() {
        let p = Product::from_input(1, widget(), Utc::now());
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["price"], json!(5.0));
        assert_eq!(v["stockQuantity"], 3);
        assert_eq!(v["isActive"], true);
        assert!(v["createdAt"].is_string());
    }

    #[test]
    fn mentions_is_case_insensitive_over_name_and_description() {
        let mut p = Product::from_input(1, widget(), Utc::now());
        p.description = Some("Handy Tool".into());
        assert!(p.mentions("widg"));
        assert!(p.mentions("handy"));
        assert!(!p.mentions("laptop"));
        assert!(p.in_category("TOOLS"));
    }

    #[test]
    fn samples_are_valid() {
        let samples = sample_products();
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.validate().is_ok()));
    }
}
