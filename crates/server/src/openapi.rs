use axum::Json;
use models::{Customer, CustomerInput, Product, ProductInput};
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Envelope without a payload (delete, fault responses).
#[derive(ToSchema)]
pub struct StatusEnvelope {
    pub success: bool,
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct ProductEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<Product>,
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct ProductListEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<Vec<Product>>,
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct CustomerEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<Customer>,
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct CustomerListEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<Vec<Customer>>,
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct AvailabilityEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<bool>,
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

/// Documentation entries for the routes served by the generic CRUD
/// handlers, which carry no `#[utoipa::path]` of their own.
#[allow(dead_code)]
mod crud_docs {
    use crate::routes::crud::SearchQuery;

    use super::*;

    #[utoipa::path(get, path = "/api/products", tag = "products",
        responses((status = 200, description = "Active products", body = ProductListEnvelope)))]
    pub fn list_products() {}

    #[utoipa::path(get, path = "/api/products/{id}", tag = "products",
        params(("id" = i32, Path, description = "Product id")),
        responses(
            (status = 200, description = "Product found", body = ProductEnvelope),
            (status = 404, description = "Unknown or inactive id", body = ProductEnvelope)))]
    pub fn get_product() {}

    #[utoipa::path(get, path = "/api/products/search", tag = "products", params(SearchQuery),
        responses((status = 200, description = "Matching products", body = ProductListEnvelope)))]
    pub fn search_products() {}

    #[utoipa::path(post, path = "/api/products", tag = "products", request_body = ProductInput,
        responses(
            (status = 201, description = "Created; Location points at the new product", body = ProductEnvelope),
            (status = 400, description = "Validation failed", body = ProductEnvelope)))]
    pub fn create_product() {}

    #[utoipa::path(put, path = "/api/products/{id}", tag = "products", request_body = ProductInput,
        params(("id" = i32, Path, description = "Product id")),
        responses(
            (status = 200, description = "Updated", body = ProductEnvelope),
            (status = 400, description = "Validation failed", body = ProductEnvelope),
            (status = 404, description = "Unknown or inactive id", body = ProductEnvelope)))]
    pub fn update_product() {}

    #[utoipa::path(delete, path = "/api/products/{id}", tag = "products",
        params(("id" = i32, Path, description = "Product id")),
        responses(
            (status = 200, description = "Soft deleted", body = StatusEnvelope),
            (status = 404, description = "Unknown or already inactive id", body = StatusEnvelope)))]
    pub fn delete_product() {}

    #[utoipa::path(get, path = "/api/customers", tag = "customers",
        responses((status = 200, description = "Active customers", body = CustomerListEnvelope)))]
    pub fn list_customers() {}

    #[utoipa::path(get, path = "/api/customers/{id}", tag = "customers",
        params(("id" = i32, Path, description = "Customer id")),
        responses(
            (status = 200, description = "Customer found", body = CustomerEnvelope),
            (status = 404, description = "Unknown or inactive id", body = CustomerEnvelope)))]
    pub fn get_customer() {}

    #[utoipa::path(get, path = "/api/customers/search", tag = "customers", params(SearchQuery),
        responses((status = 200, description = "Matching customers", body = CustomerListEnvelope)))]
    pub fn search_customers() {}

    #[utoipa::path(post, path = "/api/customers", tag = "customers", request_body = CustomerInput,
        responses(
            (status = 201, description = "Created; Location points at the new customer", body = CustomerEnvelope),
            (status = 400, description = "Validation failed or email in use", body = CustomerEnvelope)))]
    pub fn create_customer() {}

    #[utoipa::path(put, path = "/api/customers/{id}", tag = "customers", request_body = CustomerInput,
        params(("id" = i32, Path, description = "Customer id")),
        responses(
            (status = 200, description = "Updated", body = CustomerEnvelope),
            (status = 400, description = "Validation failed or email in use", body = CustomerEnvelope),
            (status = 404, description = "Unknown or inactive id", body = CustomerEnvelope)))]
    pub fn update_customer() {}

    #[utoipa::path(delete, path = "/api/customers/{id}", tag = "customers",
        params(("id" = i32, Path, description = "Customer id")),
        responses(
            (status = 200, description = "Soft deleted", body = StatusEnvelope),
            (status = 404, description = "Unknown or already inactive id", body = StatusEnvelope)))]
    pub fn delete_customer() {}
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crud_docs::list_products,
        crud_docs::get_product,
        crud_docs::search_products,
        crud_docs::create_product,
        crud_docs::update_product,
        crud_docs::delete_product,
        crate::routes::products::by_category,
        crate::routes::products::low_stock,
        crud_docs::list_customers,
        crud_docs::get_customer,
        crud_docs::search_customers,
        crud_docs::create_customer,
        crud_docs::update_customer,
        crud_docs::delete_customer,
        crate::routes::customers::by_email,
        crate::routes::customers::by_country,
        crate::routes::customers::validate_email,
    ),
    components(
        schemas(
            HealthResponse,
            StatusEnvelope,
            Product,
            ProductInput,
            ProductEnvelope,
            ProductListEnvelope,
            Customer,
            CustomerInput,
            CustomerEnvelope,
            CustomerListEnvelope,
            AvailabilityEnvelope,
        )
    ),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "customers")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_api_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/api/products",
            "/api/products/{id}",
            "/api/products/search",
            "/api/products/category/{category}",
            "/api/products/low-stock",
            "/api/customers",
            "/api/customers/{id}",
            "/api/customers/search",
            "/api/customers/email/{email}",
            "/api/customers/country/{country}",
            "/api/customers/validate-email",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
