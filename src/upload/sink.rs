//! Atomic upload ingestion.
//!
//! # Responsibilities
//! - Recognize direct PUT and multipart POST uploads
//! - Stream bodies into a uniquely named temp file in the target directory
//! - Publish the file with a single rename; never expose partial writes
//! - Hand everything that is not an upload back to the caller untouched

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;
use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::path::confine;

/// Errors surfaced by the upload sink.
///
/// Client mistakes map to 400, storage failures to 500; either way the
/// destination path is left untouched and the temp file is gone.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Malformed multipart payload or missing `file` field.
    #[error("invalid multipart upload: {0}")]
    Multipart(String),
    /// Client-supplied filename escapes the served directory.
    #[error("refusing upload filename {0:?}")]
    UnsafeFilename(String),
    #[error("failed to create upload temp file: {0}")]
    TempFile(io::Error),
    #[error("failed to write file body: {0}")]
    Write(io::Error),
    #[error("failed to rename file: {0}")]
    Rename(io::Error),
}

impl UploadError {
    fn status(&self) -> StatusCode {
        match self {
            UploadError::Multipart(_) | UploadError::UnsafeFilename(_) => StatusCode::BAD_REQUEST,
            UploadError::TempFile(_) | UploadError::Write(_) | UploadError::Rename(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (self.status(), format!("{self}\n")).into_response()
    }
}

/// Accepts uploads into a directory; everything else is handed back.
#[derive(Debug, Clone)]
pub struct UploadSink {
    dir: PathBuf,
}

impl UploadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Handle `request` if it is an upload, or give it back untouched so
    /// the caller can forward it to the inner delegate.
    pub async fn intercept(&self, request: Request) -> Result<Response, Request> {
        if request.method() == Method::PUT {
            let name = request.uri().path().to_owned();
            let result = self.put(&name, request.into_body()).await;
            return Ok(respond(result));
        }
        if request.method() == Method::POST && is_multipart(&request) {
            return Ok(respond(self.form(request).await));
        }
        Err(request)
    }

    /// Direct-put upload: the request path names the file, the body is its
    /// content.
    ///
    /// The path is percent-decoded before confinement: `ServeDir` decodes
    /// request paths the same way, so `PUT /foo%20bar.txt` must land at
    /// `foo bar.txt` for the follow-up GET to find it — and an encoded
    /// `%2e%2e` must still count as traversal.
    async fn put(&self, raw_path: &str, body: Body) -> Result<(), UploadError> {
        let name = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| UploadError::UnsafeFilename(raw_path.to_owned()))?;
        let dest = confine(&self.dir, &name)?;
        let (slot, mut file) = TempSlot::create(&self.dir).await?;

        let mut stream = body.into_data_stream();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| UploadError::Write(io::Error::other(e)))?
        {
            file.write_all(&chunk).await.map_err(UploadError::Write)?;
        }

        finish(file, slot, &dest).await
    }

    /// Form upload: the first file field named `file` supplies both the
    /// filename and the content.
    async fn form(&self, request: Request) -> Result<(), UploadError> {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?
        {
            if field.name() != Some("file") {
                continue;
            }
            let filename = field
                .file_name()
                .map(str::to_owned)
                .ok_or_else(|| UploadError::Multipart("`file` field has no filename".to_owned()))?;

            let dest = confine(&self.dir, &filename)?;
            let (slot, mut file) = TempSlot::create(&self.dir).await?;

            while let Some(chunk) = next_chunk(&mut field).await? {
                file.write_all(&chunk).await.map_err(UploadError::Write)?;
            }

            return finish(file, slot, &dest).await;
        }

        Err(UploadError::Multipart("no `file` field in form data".to_owned()))
    }
}

fn respond(result: Result<(), UploadError>) -> Response {
    match result {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::debug!(%error, "upload failed");
            error.into_response()
        }
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("multipart/form-data"))
}

async fn next_chunk(
    field: &mut axum::extract::multipart::Field<'_>,
) -> Result<Option<Bytes>, UploadError> {
    field
        .chunk()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))
}

/// Flush the temp file and publish it at `dest` with one atomic rename.
async fn finish(mut file: fs::File, slot: TempSlot, dest: &Path) -> Result<(), UploadError> {
    file.sync_all().await.map_err(UploadError::Write)?;
    drop(file);
    slot.persist(dest).await
}

/// A uniquely named temp file inside the target directory.
///
/// Lives in the same directory (and therefore the same filesystem) as the
/// destination so the final rename is atomic. Deletes itself on every exit
/// path except a successful rename, after which there is nothing left at
/// the temp path.
struct TempSlot {
    path: PathBuf,
    armed: bool,
}

impl TempSlot {
    async fn create(dir: &Path) -> Result<(Self, fs::File), UploadError> {
        let path = dir.join(format!(".upload-{}.tmp", Uuid::new_v4()));
        let file = fs::File::create(&path).await.map_err(UploadError::TempFile)?;
        Ok((
            Self { path, armed: true },
            file,
        ))
    }

    /// Rename over `dest`, disarming cleanup on success.
    async fn persist(mut self, dest: &Path) -> Result<(), UploadError> {
        fs::rename(&self.path, dest).await.map_err(UploadError::Rename)?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for TempSlot {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
