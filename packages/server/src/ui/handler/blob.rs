//! Objects of the in-memory blob store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::ui::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Serve an uploaded file or page image by bucket and path
pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, path)): Path<(String, String)>,
) -> ApiResult<Response> {
    let not_found = || ApiError::NotFound(format!("object {}/{} not found", bucket, path));

    let store = state.local_objects.as_ref().ok_or_else(not_found)?;
    let object = store.object(&bucket, &path).await.ok_or_else(not_found)?;

    Ok(([(header::CONTENT_TYPE, object.content_type)], object.bytes).into_response())
}
