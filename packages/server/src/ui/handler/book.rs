//! Book HTTP endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::{
    domain::BookId,
    infrastructure::dto::http::{BookDto, UploadBookResponse},
    ui::{auth::AuthUser, error::ApiResult, state::AppState},
    usecase::{UploadBookInput, UploadedFile},
};

/// Upload a PDF and create the book row
///
/// Multipart fields: `title`, `author`, `description` (optional) and `file`.
/// Responds as soon as the row is committed; page images are produced later.
pub async fn upload_book(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadBookResponse>> {
    let mut title = String::new();
    let mut author = String::new();
    let mut description = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_ascii_lowercase();
        match name.as_str() {
            "title" => title = field.text().await?,
            "author" => author = field.text().await?,
            "description" => description = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!("Ignoring form field '{}'", other),
        }
    }

    let book = state
        .upload_book_usecase
        .execute(UploadBookInput {
            title,
            author,
            description,
            uploaded_by: auth.user_id,
            file,
        })
        .await?;

    Ok(Json(UploadBookResponse {
        message: "Book created successfully".to_string(),
        book: book.into(),
    }))
}

/// Get a book by id; `first_page_url` is null until processing completes
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookDto>> {
    let book = state.get_book_usecase.execute(BookId::new(id)).await?;
    Ok(Json(book.into()))
}
