//! PDF upload endpoint
//!
//! `POST /upload-pdf` takes a multipart form with a `file` field holding a
//! PDF and an optional `text` field, stamps the text onto the first page
//! with the `editPDF` tool and returns the edited document as an
//! attachment.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use relay_application::ToolRegistry;
use relay_domain::constants::EDITED_PDF_NAME;
use relay_domain::error::Error;
use relay_domain::value_objects::{ContentItem, ToolArguments};
use relay_providers::tools::EDIT_PDF;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Header;
use rocket::{FromForm, Responder, State, post};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;

use super::error::{ApiError, api_error};
use crate::constants::DEFAULT_UPLOAD_STAMP;

/// State of the upload endpoint
#[derive(Clone)]
pub struct UploadState {
    /// Registry holding the `editPDF` tool
    pub registry: Arc<ToolRegistry>,
}

/// Multipart upload form
#[derive(FromForm)]
pub struct PdfUpload<'r> {
    /// The PDF to edit
    pub file: Option<TempFile<'r>>,
    /// Text to stamp; a default is used when absent
    pub text: Option<String>,
}

/// Edited PDF sent back as a download
#[derive(Responder)]
#[response(content_type = "application/pdf")]
pub struct PdfAttachment {
    body: Vec<u8>,
    disposition: Header<'static>,
}

impl PdfAttachment {
    /// Attachment with the given file name
    pub fn new(body: Vec<u8>, filename: &str) -> Self {
        Self {
            body,
            disposition: Header::new(
                "Content-Disposition",
                format!("attachment; filename={filename}"),
            ),
        }
    }
}

/// Stamp text onto an uploaded PDF
#[post("/upload-pdf", data = "<upload>")]
pub async fn upload_pdf(
    state: &State<UploadState>,
    upload: Form<PdfUpload<'_>>,
) -> Result<PdfAttachment, ApiError> {
    let upload = upload.into_inner();
    let Some(file) = upload.file.as_ref() else {
        return Err(api_error(&Error::invalid_argument("No PDF file uploaded")));
    };
    let document = read_upload(file).await.map_err(|e| api_error(&e))?;
    if !document.starts_with(b"%PDF") {
        return Err(api_error(&Error::invalid_argument(
            "Uploaded file is not a PDF document",
        )));
    }

    let text = upload
        .text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_STAMP.to_string());
    info!(bytes = document.len(), "Editing uploaded PDF");

    let mut arguments = ToolArguments::new();
    arguments.insert("file".to_string(), Value::String(BASE64.encode(&document)));
    arguments.insert("text".to_string(), Value::String(text));
    let result = state
        .registry
        .invoke(EDIT_PDF, arguments)
        .await
        .map_err(|e| api_error(&e))?;

    let edited = result
        .content
        .iter()
        .find_map(|item| match item {
            ContentItem::FileData { data, .. } => BASE64.decode(data).ok(),
            _ => None,
        })
        .ok_or_else(|| api_error(&Error::internal("editPDF returned no file")))?;

    Ok(PdfAttachment::new(edited, EDITED_PDF_NAME))
}

async fn read_upload(file: &TempFile<'_>) -> Result<Vec<u8>, Error> {
    let reader = file.open().await?;
    tokio::pin!(reader);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    Ok(buffer)
}
