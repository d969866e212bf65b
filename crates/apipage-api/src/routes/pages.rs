//! Routes for the Pages context.

use apipage_core::error::StoreError;
use apipage_pages::application::{command_handlers, query_handlers};
use apipage_pages::domain::commands;
use apipage_pages::domain::model::{Page, PageListItem};
use apipage_realtime::bridge::announce;
use apipage_realtime::message::BroadcastMessage;
use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::routes::params::{ListParams, parse_id};
use crate::state::AppState;

/// Request body for creating or replacing a page.
///
/// Missing members deserialize as empty strings and are then rejected by
/// validation, so every incomplete body gets the same error shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Page title.
    pub title: String,
    /// Page body.
    pub text: String,
}

/// GET /
#[instrument(skip(state, params))]
async fn list_pages(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<PageListItem>, ApiError> {
    let query = params.into_query();
    let page = query_handlers::list_pages(&query, &*state.page_store).await?;
    Ok(ApiResponse::Page {
        data: page.items,
        total: page.total,
    })
}

/// POST /
#[instrument(skip(state, request))]
async fn create_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Result<ApiResponse<Page>, ApiError> {
    let command = commands::CreatePage {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling create_page command");

    let page = command_handlers::handle_create_page(&command, &*state.page_store).await?;
    announce(
        &*state.broadcaster,
        &BroadcastMessage::PageCreated { page: page.clone() },
    );

    Ok(ApiResponse::Item(page))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Page>, ApiError> {
    let page_id = parse_id(&id)?;
    query_handlers::get_page_by_id(page_id, &*state.page_store)
        .await?
        .map(ApiResponse::Item)
        .ok_or(ApiError(StoreError::NotFound(page_id)))
}

/// POST /{id}. The id in the path wins over any id in the body.
#[instrument(skip(state, request))]
async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PageRequest>,
) -> Result<ApiResponse<Page>, ApiError> {
    let command = commands::UpdatePage {
        correlation_id: Uuid::new_v4(),
        page_id: parse_id(&id)?,
        title: request.title,
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling update_page command");

    let page = command_handlers::handle_update_page(&command, &*state.page_store).await?;
    announce(
        &*state.broadcaster,
        &BroadcastMessage::PageUpdated { page: page.clone() },
    );

    Ok(ApiResponse::Item(page))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let command = commands::DeletePage {
        correlation_id: Uuid::new_v4(),
        page_id: parse_id(&id)?,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_page command");

    command_handlers::handle_delete_page(&command, &*state.page_store).await?;
    announce(
        &*state.broadcaster,
        &BroadcastMessage::PageDeleted {
            id: command.page_id,
        },
    );

    Ok(ApiResponse::Empty)
}

/// Returns the router for the pages context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages).post(create_page))
        .route("/{id}", get(get_page).post(update_page).delete(delete_page))
}
