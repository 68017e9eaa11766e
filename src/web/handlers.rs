// Request handlers for the web front-end

use super::{
    SharedRemover,
    error::ApiError,
    extract_request_data::{UploadedImage, extract_uploaded_image},
    image_codec::{encode_data_url, ensure_png, to_png_bytes},
    models::PageContext,
    page::render_page,
};
use axum::{
    extract::{Request, State},
    response::Html,
};
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;

// --- GET / ---
// Upload page with static metadata and no images
pub async fn index() -> Html<String> {
    Html(render_page(&PageContext::base()).into_string())
}

// --- POST /remove ---
// Removes the background of the uploaded image and shows both versions
pub async fn remove_background(
    State(remover): State<SharedRemover>,
    request: Request,
) -> Result<Html<String>, ApiError> {
    let upload = extract_uploaded_image(request).await?;
    let context = build_result_context(remover, upload).await?;
    Ok(Html(render_page(&context).into_string()))
}

/// Validates the upload, runs removal and original normalization concurrently,
/// and assembles the page context.
pub async fn build_result_context(
    remover: SharedRemover,
    upload: UploadedImage,
) -> Result<PageContext, ApiError> {
    upload.validate()?;

    let request_id = Uuid::new_v4();
    info!(
        "Remove request: file={:?}, content_type={:?}, size={}, request_id={}",
        upload.file_name,
        upload.content_type,
        upload.data.len(),
        request_id
    );

    let removal_input = upload.data.to_vec();
    let original_input = upload.data;

    // Tasks in the set are aborted when it is dropped, so an abandoned request
    // also stops its remover.
    let mut removal_task: JoinSet<Result<Vec<u8>, String>> = JoinSet::new();
    removal_task.spawn(async move {
        let output = remover
            .remove(removal_input)
            .await
            .map_err(|e| e.to_string())?;
        tokio::task::spawn_blocking(move || ensure_png(output))
            .await
            .map_err(|e| format!("PNG conversion task failed: {}", e))?
            .map_err(|e| format!("removal output is not an image: {}", e))
    });

    let (removal, original) = tokio::join!(
        removal_task.join_next(),
        tokio::task::spawn_blocking(move || to_png_bytes(&original_input)),
    );

    let result_png = removal
        .ok_or_else(|| ApiError::InternalServerError("Removal task was not started".to_string()))?
        .map_err(|e| ApiError::InternalServerError(format!("Removal task failed: {}", e)))?
        .map_err(|e| {
            error!("Background removal failed (request_id={}): {}", request_id, e);
            ApiError::ProcessingFailed
        })?;

    let (original_png, (width, height)) = original
        .map_err(|e| ApiError::InternalServerError(format!("Image decode task failed: {}", e)))?
        .map_err(|e| {
            error!(
                "Failed to decode uploaded image (request_id={}): {}",
                request_id, e
            );
            ApiError::ProcessingFailed
        })?;

    debug!(
        "Remove completed: original {}x{}, result {} bytes, request_id={}",
        width,
        height,
        result_png.len(),
        request_id
    );

    Ok(PageContext::with_images(
        encode_data_url(&original_png),
        encode_data_url(&result_png),
        upload.file_name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remover::{
        BackgroundRemover, RemovalError, RemovalFuture,
        mock::{EchoRemover, FailingRemover, PanickingRemover, StaticRemover},
    };
    use crate::web::image_codec::{
        decode_data_url,
        test_images::{gray_strip_jpeg, red_square_png, transparent_square_png},
    };
    use axum::body::Bytes;
    use image::{ColorType, ImageFormat};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };
    use std::time::Duration;

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    // Never finishes; records when its work is dropped.
    struct HangingRemover(Arc<AtomicBool>);

    impl BackgroundRemover for HangingRemover {
        fn remove(&self, _input: Vec<u8>) -> RemovalFuture<'_> {
            let guard = SetOnDrop(self.0.clone());
            Box::pin(async move {
                let _guard = guard;
                std::future::pending::<()>().await;
                Ok::<_, RemovalError>(Vec::new())
            })
        }
    }

    fn png_upload(data: Vec<u8>, file_name: Option<&str>) -> UploadedImage {
        UploadedImage {
            data: Bytes::from(data),
            content_type: Some("image/png".to_string()),
            file_name: file_name.map(str::to_string),
        }
    }

    fn decode_png(data_url: Option<&str>) -> image::DynamicImage {
        let bytes = decode_data_url(data_url.unwrap()).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap()
    }

    #[tokio::test]
    async fn test_context_contains_both_images() {
        let remover: SharedRemover = Arc::new(StaticRemover(transparent_square_png()));
        let context = build_result_context(remover, png_upload(red_square_png(), Some("red.png")))
            .await
            .unwrap();

        let original = decode_png(context.original_image.as_deref());
        assert_eq!((original.width(), original.height()), (2, 2));
        assert_eq!(original.color(), ColorType::Rgba8);

        let result_bytes = decode_data_url(context.result_image.as_deref().unwrap()).unwrap();
        assert_eq!(result_bytes, transparent_square_png());

        assert_eq!(context.file_name.as_deref(), Some("red.png"));
        assert_eq!(context.author_name, "Def");
    }

    #[tokio::test]
    async fn test_non_png_removal_output_is_normalized() {
        // Echoing a JPEG upload back must still produce a PNG data URL.
        let remover: SharedRemover = Arc::new(EchoRemover);
        let upload = UploadedImage {
            data: Bytes::from(gray_strip_jpeg()),
            content_type: Some("image/jpeg".to_string()),
            file_name: None,
        };
        let context = build_result_context(remover, upload).await.unwrap();

        let result = decode_png(context.result_image.as_deref());
        assert_eq!((result.width(), result.height()), (3, 1));
        assert_eq!(result.color(), ColorType::Rgba8);
        assert_eq!(context.file_name.as_deref(), Some("result.png"));
    }

    #[tokio::test]
    async fn test_removal_failure_is_generic() {
        let remover: SharedRemover = Arc::new(FailingRemover);
        let result = build_result_context(remover, png_upload(red_square_png(), None)).await;
        assert!(matches!(result, Err(ApiError::ProcessingFailed)));
    }

    #[tokio::test]
    async fn test_undecodable_upload_is_processing_failure() {
        let remover: SharedRemover = Arc::new(StaticRemover(transparent_square_png()));
        let result =
            build_result_context(remover, png_upload(b"not really a png".to_vec(), None)).await;
        assert!(matches!(result, Err(ApiError::ProcessingFailed)));
    }

    #[tokio::test]
    async fn test_non_image_removal_output_is_processing_failure() {
        let remover: SharedRemover = Arc::new(StaticRemover(b"garbage".to_vec()));
        let result = build_result_context(remover, png_upload(red_square_png(), None)).await;
        assert!(matches!(result, Err(ApiError::ProcessingFailed)));
    }

    #[tokio::test]
    async fn test_validation_runs_before_removal() {
        let remover: SharedRemover = Arc::new(FailingRemover);
        let upload = UploadedImage {
            data: Bytes::new(),
            content_type: Some("image/png".to_string()),
            file_name: None,
        };
        match build_result_context(remover, upload).await {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Uploaded file is empty."),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panicking_remover_is_internal_error() {
        let remover: SharedRemover = Arc::new(PanickingRemover);
        let result = build_result_context(remover, png_upload(red_square_png(), None)).await;
        assert!(matches!(result, Err(ApiError::InternalServerError(_))));
    }

    #[tokio::test]
    async fn test_abandoned_request_stops_removal() {
        let dropped = Arc::new(AtomicBool::new(false));
        let remover: SharedRemover = Arc::new(HangingRemover(dropped.clone()));

        let result = tokio::time::timeout(
            Duration::from_millis(200),
            build_result_context(remover, png_upload(red_square_png(), None)),
        )
        .await;
        assert!(result.is_err());

        for _ in 0..50 {
            if dropped.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("removal kept running after the request was dropped");
    }
}
