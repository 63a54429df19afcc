//! Extractor wrappers whose rejections render as `ApiError` envelopes
//! instead of axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query};

use crate::errors::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
