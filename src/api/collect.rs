use std::sync::Arc;

use axum::{
    Extension,
    body::Bytes,
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};

use crate::{
    api::rate_limit::UploadLimits,
    info,
    pipeline::Pipeline,
    spotify::SpotifyClient,
    types::ArtistRecord,
    utils::{has_csv_extension, parse_artist_names},
    warning,
};

/// Shared state of the API handlers.
pub struct ApiState {
    pub client: SpotifyClient,
    /// Column of the uploaded CSV that holds the artist names.
    pub column: String,
    pub limits: UploadLimits,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Form field that carries the uploaded file.
const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    data: Bytes,
}

/// Runs the enrichment pipeline for an uploaded CSV file.
///
/// The request is a `multipart/form-data` form whose `file` field holds the
/// CSV. The response is the list of resolved artists in input order; an
/// upload in which nothing resolved returns an empty list.
///
/// # Status Codes
///
/// - `200` - pipeline finished
/// - `400` - no file, a file without `.csv` extension, or no artist column
/// - `429` - upload quota of the client exhausted (see [`super::rate_limit`])
/// - `502` - Spotify credentials could not be obtained
pub async fn collect(
    Extension(state): Extension<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ArtistRecord>>, ApiError> {
    let upload = match read_upload(&mut multipart).await? {
        Some(upload) if !upload.filename.is_empty() && !upload.data.is_empty() => upload,
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "No file selected")),
    };

    if !has_csv_extension(&upload.filename) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid file format. Please upload a CSV file.",
        ));
    }

    let names = parse_artist_names(&upload.data, &state.column)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid CSV file: {}", e)))?;

    info!(
        "Processing {} artists from uploaded file {}",
        names.len(),
        upload.filename
    );

    let mut pipeline = Pipeline::new(state.client.clone());
    match pipeline.run(&names).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            warning!("Failed to obtain access token. Err: {}", e);
            Err(api_error(
                StatusCode::BAD_GATEWAY,
                "Failed to authenticate with Spotify",
            ))
        }
    }
}

/// Returns the first `file` field of the form, other fields are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    let read_error = |e: MultipartError| api_error(e.status(), e.body_text());

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(read_error)?;
        return Ok(Some(Upload { filename, data }));
    }

    Ok(None)
}
