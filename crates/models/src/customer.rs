use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::validation::{is_email_shaped, is_phone_shaped, Validate, Violations};

/// A registered customer. `full_name` is derived and only appears in the
/// serialized form.
#[derive(Clone, Debug, PartialEq, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Validate for CustomerInput {
    fn validate(&self) -> Result<(), ModelError> {
        let mut v = Violations::new();
        v.required(&self.first_name, "First name is required");
        v.max_len(&self.first_name, 50, "First name cannot exceed 50 characters");
        v.required(&self.last_name, "Last name is required");
        v.max_len(&self.last_name, 50, "Last name cannot exceed 50 characters");
        if v.required(&self.email, "Email address is required") {
            v.check(is_email_shaped(&self.email), "Invalid email address format");
        }
        v.max_len(&self.email, 100, "Email cannot exceed 100 characters");
        if let Some(phone) = self.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
            v.check(is_phone_shaped(phone), "Invalid phone number format");
            v.max_len(phone, 20, "Phone number cannot exceed 20 characters");
        }
        v.optional_max_len(self.address.as_deref(), 200, "Address cannot exceed 200 characters");
        v.optional_max_len(self.city.as_deref(), 50, "City cannot exceed 50 characters");
        v.optional_max_len(self.country.as_deref(), 50, "Country cannot exceed 50 characters");
        v.finish()
    }
}

impl Customer {
    pub fn from_input(id: i32, input: CustomerInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            address: input.address,
            city: input.city,
            country: input.country,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field; `id` and `created_at` are kept.
    pub fn apply(&mut self, input: CustomerInput, now: DateTime<Utc>) {
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.email = input.email;
        self.phone_number = input.phone_number;
        self.address = input.address;
        self.city = input.city;
        self.country = input.country;
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    pub fn in_country(&self, country: &str) -> bool {
        self.country
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == country.to_lowercase())
    }

    /// Case-insensitive substring match on first name, last name or email.
    /// `needle` must already be lowercased.
    pub fn mentions(&self, needle: &str) -> bool {
        [&self.first_name, &self.last_name, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Serialize for Customer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Customer", 12)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("firstName", &self.first_name)?;
        s.serialize_field("lastName", &self.last_name)?;
        s.serialize_field("email", &self.email)?;
        s.serialize_field("phoneNumber", &self.phone_number)?;
        s.serialize_field("address", &self.address)?;
        s.serialize_field("city", &self.city)?;
        s.serialize_field("country", &self.country)?;
        s.serialize_field("isActive", &self.is_active)?;
        s.serialize_field("createdAt", &self.created_at)?;
        s.serialize_field("updatedAt", &self.updated_at)?;
        s.serialize_field("fullName", &self.full_name())?;
        s.end()
    }
}

fn sample(first: &str, last: &str, phone_suffix: u8, address: &str, city: &str) -> CustomerInput {
    CustomerInput {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@email.com", first.to_lowercase(), last.to_lowercase()),
        phone_number: Some(format!("+123456789{phone_suffix}")),
        address: Some(address.into()),
        city: Some(city.into()),
        country: Some("USA".into()),
        is_active: true,
    }
}

/// Rows a fresh customer store starts with.
pub fn sample_customers() -> Vec<CustomerInput> {
    vec![
        sample("John", "Doe", 0, "123 Main St", "New York"),
        sample("Jane", "Smith", 1, "456 Oak Ave", "Los Angeles"),
        sample("Mike", "Johnson", 2, "789 Pine Rd", "Chicago"),
        sample("Sarah", "Williams", 3, "321 Elm St", "Houston"),
        sample("David", "Brown", 4, "654 Maple Dr", "Phoenix"),
    ]
}
