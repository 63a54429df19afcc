//! Handlers shared by every entity family, generic over the repository
//! service. Family-specific reads live next to the family's router.

use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use common::types::{ApiResponse, ApiStatus};
use serde::Deserialize;
use service::errors::ServiceError;
use service::storage::Record;
use service::EntityService;
use tracing::info;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::catch_panic;
use crate::state::AppState;

/// Naming for one entity family as it appears in URLs and messages.
pub trait ApiResource: EntityService {
    /// Capitalized singular, e.g. `Product`.
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    /// Collection segment under `/api`.
    const COLLECTION: &'static str;

    fn location(id: i32) -> String {
        format!("/api/{}/{}", Self::COLLECTION, id)
    }

    fn not_found(id: i32) -> String {
        format!("{} with ID {} not found", Self::SINGULAR, id)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Blank or missing lists every active record.
    #[serde(default)]
    pub search_term: String,
}

fn service_error<S: ApiResource>(action: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
    move |err| match err {
        ServiceError::Validation(errors) => ApiError::Validation {
            message: format!("Invalid {} data", S::SINGULAR.to_lowercase()),
            errors,
        },
        ServiceError::Conflict(msg) => ApiError::Conflict(msg),
        source @ ServiceError::Internal(_) => ApiError::Unexpected {
            context: format!("An error occurred while {action} the {}", S::SINGULAR.to_lowercase()),
            source,
        },
    }
}

pub async fn list<S: ApiResource>(State(svc): State<Arc<S>>) -> Json<ApiResponse<Vec<S::Record>>> {
    let items = svc.list_all();
    info!(collection = S::COLLECTION, count = items.len(), "list");
    Json(ApiResponse::success(items, format!("{} retrieved successfully", S::PLURAL)))
}

pub async fn get_by_id<S: ApiResource>(
    State(svc): State<Arc<S>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<S::Record>>, ApiError> {
    match svc.get_by_id(id) {
        Some(item) => Ok(Json(ApiResponse::success(item, format!("{} retrieved successfully", S::SINGULAR)))),
        None => Err(ApiError::NotFound(S::not_found(id))),
    }
}

pub async fn search<S: ApiResource>(
    State(svc): State<Arc<S>>,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> Json<ApiResponse<Vec<S::Record>>> {
    let items = svc.search(&q.search_term);
    info!(collection = S::COLLECTION, term = %q.search_term, count = items.len(), "search");
    Json(ApiResponse::success(items, format!("{} search completed successfully", S::SINGULAR)))
}

pub async fn create<S: ApiResource>(
    State(svc): State<Arc<S>>,
    ApiJson(input): ApiJson<S::Input>,
) -> Result<impl IntoResponse, ApiError> {
    let item = svc.create(input).map_err(service_error::<S>("creating"))?;
    let location = S::location(item.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(item, format!("{} created successfully", S::SINGULAR))),
    ))
}

pub async fn update<S: ApiResource>(
    State(svc): State<Arc<S>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<S::Input>,
) -> Result<Json<ApiResponse<S::Record>>, ApiError> {
    match svc.update(id, input).map_err(service_error::<S>("updating"))? {
        Some(item) => Ok(Json(ApiResponse::success(item, format!("{} updated successfully", S::SINGULAR)))),
        None => Err(ApiError::NotFound(S::not_found(id))),
    }
}

pub async fn remove<S: ApiResource>(
    State(svc): State<Arc<S>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiStatus>, ApiError> {
    if svc.delete(id) {
        Ok(Json(ApiStatus::success(format!("{} deleted successfully", S::SINGULAR))))
    } else {
        Err(ApiError::NotFound(S::not_found(id)))
    }
}

/// List, search and item routes for one family.
pub fn routes<S>() -> Router<AppState>
where
    S: ApiResource,
    Arc<S>: FromRef<AppState>,
{
    let collection = format!("/api/{}", S::COLLECTION);
    let plural = S::PLURAL.to_lowercase();
    let singular = S::SINGULAR.to_lowercase();
    Router::new()
        .route(
            &collection,
            get(list::<S>)
                .layer(catch_panic(format!("retrieving {plural}")))
                .merge(post(create::<S>).layer(catch_panic(format!("creating the {singular}")))),
        )
        .route(
            &format!("{collection}/search"),
            get(search::<S>).layer(catch_panic(format!("searching {plural}"))),
        )
        .route(
            &format!("{collection}/:id"),
            get(get_by_id::<S>)
                .layer(catch_panic(format!("retrieving the {singular}")))
                .merge(put(update::<S>).layer(catch_panic(format!("updating the {singular}"))))
                .merge(delete(remove::<S>).layer(catch_panic(format!("deleting the {singular}")))),
        )
}
