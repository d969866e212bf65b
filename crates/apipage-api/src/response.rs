//! Success envelopes shared by the REST routes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Body of a successful REST response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse<T = ()> {
    /// `{"data": <record>}`
    Item(T),
    /// `{"data": [<projection>…], "total": n}`; `total` counts the filtered
    /// set before pagination.
    Page {
        /// Records in the requested window.
        data: Vec<T>,
        /// Filtered total.
        total: usize,
    },
    /// 200 with no body.
    Empty,
}

#[derive(Serialize)]
struct ItemBody<T> {
    data: T,
}

#[derive(Serialize)]
struct PageBody<T> {
    data: Vec<T>,
    total: usize,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Item(data) => Json(ItemBody { data }).into_response(),
            Self::Page { data, total } => Json(PageBody { data, total }).into_response(),
            Self::Empty => StatusCode::OK.into_response(),
        }
    }
}
