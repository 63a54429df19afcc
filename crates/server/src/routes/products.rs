use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use common::types::ApiResponse;
use models::Product;
use serde::Deserialize;
use service::product_service::DEFAULT_LOW_STOCK_THRESHOLD;
use service::ProductService;
use tracing::info;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::extractors::{ApiPath, ApiQuery};
use crate::middleware::catch_panic;
use crate::routes::crud::{self, ApiResource};
use crate::state::AppState;

impl ApiResource for ProductService {
    const SINGULAR: &'static str = "Product";
    const PLURAL: &'static str = "Products";
    const COLLECTION: &'static str = "products";
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Defaults to 10.
    pub threshold: Option<i32>,
}

/// Active products in one category.
#[utoipa::path(
    get,
    path = "/api/products/category/{category}",
    tag = "products",
    params(("category" = String, Path, description = "Category name, case-insensitive")),
    responses((status = 200, description = "Active products in the category", body = crate::openapi::ProductListEnvelope))
)]
pub async fn by_category(
    State(svc): State<Arc<ProductService>>,
    ApiPath(category): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let items = svc.by_category(&category);
    info!(%category, count = items.len(), "products by category");
    Ok(Json(ApiResponse::success(
        items,
        format!("Products in category '{category}' retrieved successfully"),
    )))
}

/// Active products running low on stock.
#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "products",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Active products below the threshold", body = crate::openapi::ProductListEnvelope),
        (status = 400, description = "Threshold is not an integer", body = crate::openapi::StatusEnvelope)
    )
)]
pub async fn low_stock(
    State(svc): State<Arc<ProductService>>,
    ApiQuery(q): ApiQuery<LowStockQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let threshold = q.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let items = svc.low_stock(threshold);
    info!(threshold, count = items.len(), "low stock products");
    Ok(Json(ApiResponse::success(
        items,
        format!("Products with stock below {threshold} retrieved successfully"),
    )))
}

pub fn router() -> Router<AppState> {
    crud::routes::<ProductService>()
        .route(
            "/api/products/category/:category",
            get(by_category).layer(catch_panic("retrieving products")),
        )
        .route(
            "/api/products/low-stock",
            get(low_stock).layer(catch_panic("retrieving low stock products")),
        )
}
