//! Photo upload with a server-rendered HTML result page.
//!
//! Accepts a multipart form with an optional `file` photo and the personal
//! data text fields, stores the photo under `UPLOAD_DIR` and echoes every
//! field back HTML-escaped. Failures render an HTML alert, never JSON.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use sketchform_core::upload::{
    render_error_page, render_result_page, sanitize_file_name, validate_image_upload,
    SubmittedFields, UploadRejection,
};

use crate::state::AppState;

type HtmlResponse = (StatusCode, Html<String>);

struct Photo {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

fn error_page(status: StatusCode, message: &str) -> HtmlResponse {
    (status, Html(render_error_page(message)))
}

/// POST /upload
pub async fn upload_form(State(state): State<AppState>, mut multipart: Multipart) -> HtmlResponse {
    let mut fields = SubmittedFields::default();
    let mut photo: Option<Photo> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed upload form");
                return error_page(e.status(), &e.body_text());
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = match field.bytes().await {
                Ok(data) => data,
                Err(e) => return error_page(e.status(), &e.body_text()),
            };
            // Browsers send an empty part when no file was chosen.
            if !file_name.is_empty() && !data.is_empty() {
                photo = Some(Photo {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
        } else {
            match field.text().await {
                Ok(value) => fields.set(&name, value),
                Err(e) => return error_page(e.status(), &e.body_text()),
            }
        }
    }

    let photo_url = match photo {
        Some(photo) => match store_photo(&state, photo).await {
            Ok(url) => Some(url),
            Err(response) => return response,
        },
        None => None,
    };

    tracing::info!(photo = photo_url.is_some(), "Upload form received");
    (
        StatusCode::OK,
        Html(render_result_page(&fields, photo_url.as_deref())),
    )
}

/// Validate and write the photo. Returns its public URL.
async fn store_photo(state: &AppState, photo: Photo) -> Result<String, HtmlResponse> {
    if let Err(rejection) =
        validate_image_upload(&photo.content_type, &photo.data, state.config.upload_max_bytes)
    {
        tracing::warn!(file = %photo.file_name, reason = %rejection, "Upload rejected");
        let status = match rejection {
            UploadRejection::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadRejection::UnsupportedType(_) | UploadRejection::ContentMismatch(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        return Err(error_page(status, &rejection.to_string()));
    }

    let stored_name = format!(
        "{}_{}",
        uuid::Uuid::new_v4(),
        sanitize_file_name(&photo.file_name)
    );
    let dir = &state.config.upload_dir;
    let path = dir.join(&stored_name);

    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &photo.data).await
    }
    .await;
    if let Err(e) = written {
        tracing::error!(path = %path.display(), error = %e, "Failed to store upload");
        return Err(error_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save the uploaded file",
        ));
    }

    tracing::info!(path = %path.display(), bytes = photo.data.len(), "Photo stored");
    Ok(format!("/uploads/{stored_name}"))
}
