//! HTTP request handlers for the mock server.
//!
//! All `/api/...` requests go through [`api_get`], which checks the request
//! signature against the raw path and query before routing, just as the
//! real server signs over what it received.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::request::{ElementRef, Query, Scope};

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    (
        status,
        Json(serde_json::json!({
            "status": status.as_u16(),
            "message": message,
        })),
    )
        .into_response()
}

fn not_found(what: &str, id: &str) -> Response {
    error(StatusCode::NOT_FOUND, format!("{what} {id} not found"))
}

/// GET /api/*
pub async fn api_get(
    State(state): State<Arc<RwLock<MockState>>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path();
    let query = uri.query().unwrap_or_default();

    let mut state = state.write().await;
    state.request_count += 1;

    if let Err(reason) = state.verify_signature(&headers, path, query) {
        return error(StatusCode::UNAUTHORIZED, reason);
    }

    if let Some(location) = state.redirects.get(path) {
        return (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location.clone())]).into_response();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["api", "documents", did] => get_document(&state, did),
        ["api", "documents", "d", did, wvm, wvm_id, "elements"] => {
            match Scope::from_segment(wvm, *wvm_id) {
                Some(scope) => list_elements(&state, did, &scope, query),
                None => error(StatusCode::BAD_REQUEST, format!("unknown selector {wvm}")),
            }
        }
        ["api", "parts", "d", did, wvm, wvm_id, "e", eid] => {
            match Scope::from_segment(wvm, *wvm_id) {
                Some(scope) => list_parts(&state, &ElementRef::new(*did, scope, *eid)),
                None => error(StatusCode::BAD_REQUEST, format!("unknown selector {wvm}")),
            }
        }
        ["api", "assemblies", "d", did, wvm, wvm_id, "e", eid, "bom"] => {
            match Scope::from_segment(wvm, *wvm_id) {
                Some(scope) => get_bom(&state, &ElementRef::new(*did, scope, *eid)),
                None => error(StatusCode::BAD_REQUEST, format!("unknown selector {wvm}")),
            }
        }
        _ => error(StatusCode::NOT_FOUND, format!("no route for {path}")),
    }
}

/// GET /api/documents/{did}
fn get_document(state: &MockState, document_id: &str) -> Response {
    match state.get_document(document_id) {
        Some(document) => (StatusCode::OK, Json(document.clone())).into_response(),
        None => not_found("Document", document_id),
    }
}

/// GET /api/documents/d/{did}/{wvm}/{wvmid}/elements
fn list_elements(state: &MockState, document_id: &str, scope: &Scope, query: &str) -> Response {
    let query = Query::parse(query);

    match state.list_elements(
        document_id,
        scope,
        query.get("elementType"),
        query.get("elementId"),
    ) {
        Some(elements) => (StatusCode::OK, Json(elements)).into_response(),
        None => not_found("Document", document_id),
    }
}

/// GET /api/parts/d/{did}/{wvm}/{wvmid}/e/{eid}
fn list_parts(state: &MockState, element: &ElementRef) -> Response {
    match state.get_parts(element) {
        Some(parts) => (StatusCode::OK, Json(parts.clone())).into_response(),
        None => not_found("Element", &element.element_id),
    }
}

/// GET /api/assemblies/d/{did}/{wvm}/{wvmid}/e/{eid}/bom
fn get_bom(state: &MockState, assembly: &ElementRef) -> Response {
    match state.get_bom(assembly) {
        Some(bom) => (StatusCode::OK, Json(bom.clone())).into_response(),
        None => not_found("Assembly", &assembly.element_id),
    }
}
