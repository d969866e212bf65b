//! Routes for the Events context.

use apipage_core::error::StoreError;
use apipage_events::application::{command_handlers, query_handlers};
use apipage_events::domain::commands::{self, EventDraft};
use apipage_events::domain::model::{Event, EventKind, EventListItem, Field};
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

/// Request body for creating or replacing an event.
///
/// Scalar members default to empty and are checked by validation; each
/// entry of `fields` must carry `type` and `description`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventRequest {
    pub constant: String,
    pub label: Option<String>,
    pub value: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub fields: Vec<Field>,
}

impl From<EventRequest> for EventDraft {
    fn from(request: EventRequest) -> Self {
        Self {
            constant: request.constant,
            label: request.label,
            value: request.value,
            description: request.description,
            kind: request.kind,
            fields: request.fields,
        }
    }
}

/// GET /
#[instrument(skip(state, params))]
async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<EventListItem>, ApiError> {
    let query = params.into_query();
    let page = query_handlers::list_events(&query, &*state.event_store).await?;
    Ok(ApiResponse::Page {
        data: page.items,
        total: page.total,
    })
}

/// POST /
#[instrument(skip(state, request), fields(constant = %request.constant))]
async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<ApiResponse<Event>, ApiError> {
    let command = commands::CreateEvent {
        correlation_id: Uuid::new_v4(),
        draft: request.into(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_event command");

    let event = command_handlers::handle_create_event(&command, &*state.event_store).await?;
    announce(
        &*state.broadcaster,
        &BroadcastMessage::EventCreated {
            event: event.clone(),
        },
    );

    Ok(ApiResponse::Item(event))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Event>, ApiError> {
    let event_id = parse_id(&id)?;
    query_handlers::get_event_by_id(event_id, &*state.event_store)
        .await?
        .map(ApiResponse::Item)
        .ok_or(ApiError(StoreError::NotFound(event_id)))
}

/// POST /{id}. The id in the path wins over any id in the body.
#[instrument(skip(state, request))]
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<EventRequest>,
) -> Result<ApiResponse<Event>, ApiError> {
    let command = commands::UpdateEvent {
        correlation_id: Uuid::new_v4(),
        event_id: parse_id(&id)?,
        draft: request.into(),
    };

    info!(correlation_id = %command.correlation_id, "handling update_event command");

    let event = command_handlers::handle_update_event(&command, &*state.event_store).await?;
    announce(
        &*state.broadcaster,
        &BroadcastMessage::EventUpdated {
            event: event.clone(),
        },
    );

    Ok(ApiResponse::Item(event))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let command = commands::DeleteEvent {
        correlation_id: Uuid::new_v4(),
        event_id: parse_id(&id)?,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_event command");

    command_handlers::handle_delete_event(&command, &*state.event_store).await?;
    announce(
        &*state.broadcaster,
        &BroadcastMessage::EventDeleted {
            id: command.event_id,
        },
    );

    Ok(ApiResponse::Empty)
}

/// Returns the router for the events context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).post(update_event).delete(delete_event),
        )
}
