use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};
use tracing::{debug, warn};

use super::error::ApiError;

/// Name of the multipart field carrying the image
pub const FILE_FIELD_NAME: &str = "file";

/// An uploaded file as received, before any validation
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl UploadedImage {
    /// Checks that the upload is declared as an image and is not empty.
    pub fn validate(&self) -> Result<(), ApiError> {
        let is_image = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(ApiError::BadRequest(
                "Please upload an image file.".to_string(),
            ));
        }

        if self.data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty.".to_string()));
        }

        Ok(())
    }
}

// Extracts the "file" field from a multipart request
pub async fn extract_uploaded_image(request: Request) -> Result<UploadedImage, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart request: {}", e)))?;

    let mut upload: Option<UploadedImage> = None;
    let mut ignored_fields = 0;

    // Loop through all fields to find "file" and ignore others
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart field: {}", e)))?
    {
        if field.name() == Some(FILE_FIELD_NAME) {
            if upload.is_some() {
                warn!("Multiple 'file' fields found in multipart request, using the last one");
            }

            let content_type = field.content_type().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            debug!(
                "Received file {:?} with content type: {:?}",
                file_name, content_type
            );

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?;

            upload = Some(UploadedImage {
                data,
                content_type,
                file_name,
            });
        } else {
            let field_name = field.name().unwrap_or("unnamed").to_string();
            debug!("Ignoring multipart field: {}", field_name);
            ignored_fields += 1;
        }
    }

    if ignored_fields > 0 {
        debug!(
            "Ignored {} non-file fields in multipart request",
            ignored_fields
        );
    }

    upload.ok_or_else(|| {
        ApiError::BadRequest("Missing 'file' field in multipart request.".to_string())
    })
}
