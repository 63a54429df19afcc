use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use common::types::ApiResponse;
use models::Customer;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use service::CustomerService;
use tracing::info;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::extractors::{ApiPath, ApiQuery};
use crate::middleware::catch_panic;
use crate::routes::crud::{self, ApiResource};
use crate::state::AppState;

impl ApiResource for CustomerService {
    const SINGULAR: &'static str = "Customer";
    const PLURAL: &'static str = "Customers";
    const COLLECTION: &'static str = "customers";
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmailCheckQuery {
    /// Missing is treated as empty, which is always available.
    #[serde(default)]
    pub email: String,
    /// Customer being edited; its own address does not count as taken.
    /// Blank is the same as missing.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exclude_customer_id: Option<i32>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

#[utoipa::path(
    get,
    path = "/api/customers/email/{email}",
    tag = "customers",
    params(("email" = String, Path, description = "Email address, case-insensitive")),
    responses(
        (status = 200, description = "Customer found", body = crate::openapi::CustomerEnvelope),
        (status = 404, description = "No active customer has this email", body = crate::openapi::CustomerEnvelope)
    )
)]
pub async fn by_email(
    State(svc): State<Arc<CustomerService>>,
    ApiPath(email): ApiPath<String>,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    match svc.get_by_email(&email) {
        Some(c) => Ok(Json(ApiResponse::success(c, "Customer retrieved successfully"))),
        None => Err(ApiError::NotFound(format!("Customer with email {email} not found"))),
    }
}

#[utoipa::path(
    get,
    path = "/api/customers/country/{country}",
    tag = "customers",
    params(("country" = String, Path, description = "Country name, case-insensitive")),
    responses((status = 200, description = "Active customers in the country", body = crate::openapi::CustomerListEnvelope))
)]
pub async fn by_country(
    State(svc): State<Arc<CustomerService>>,
    ApiPath(country): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, ApiError> {
    let items = svc.by_country(&country);
    info!(%country, count = items.len(), "customers by country");
    Ok(Json(ApiResponse::success(
        items,
        format!("Customers in country '{country}' retrieved successfully"),
    )))
}

#[utoipa::path(
    get,
    path = "/api/customers/validate-email",
    tag = "customers",
    params(EmailCheckQuery),
    responses((status = 200, description = "Availability flag", body = crate::openapi::AvailabilityEnvelope))
)]
pub async fn validate_email(
    State(svc): State<Arc<CustomerService>>,
    ApiQuery(q): ApiQuery<EmailCheckQuery>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let available = svc.email_available(&q.email, q.exclude_customer_id);
    let message = if available { "Email is available" } else { "Email is already in use" };
    Ok(Json(ApiResponse::success(available, message)))
}

pub fn router() -> Router<AppState> {
    crud::routes::<CustomerService>()
        .route(
            "/api/customers/email/:email",
            get(by_email).layer(catch_panic("retrieving the customer")),
        )
        .route(
            "/api/customers/country/:country",
            get(by_country).layer(catch_panic("retrieving customers")),
        )
        .route(
            "/api/customers/validate-email",
            get(validate_email).layer(catch_panic("validating the email")),
        )
}
