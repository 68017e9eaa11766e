use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Prefix of every data URL produced by [`encode_data_url`]
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decodes arbitrary image bytes, converts them to RGBA and re-encodes them as PNG.
///
/// Returns the PNG bytes together with the image size in pixels.
pub fn to_png_bytes(image_bytes: &[u8]) -> Result<(Vec<u8>, (u32, u32)), image::ImageError> {
    let rgba = image::load_from_memory(image_bytes)?.to_rgba8();
    let size = rgba.dimensions();

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba).write_to(&mut buffer, ImageFormat::Png)?;

    debug!(
        "Normalized {} input bytes to a {}x{} RGBA PNG",
        image_bytes.len(),
        size.0,
        size.1
    );

    Ok((buffer.into_inner(), size))
}

/// Passes PNG bytes through untouched and normalizes anything else with [`to_png_bytes`].
pub fn ensure_png(image_bytes: Vec<u8>) -> Result<Vec<u8>, image::ImageError> {
    match image::guess_format(&image_bytes) {
        Ok(ImageFormat::Png) => Ok(image_bytes),
        _ => to_png_bytes(&image_bytes).map(|(png, _)| png),
    }
}

/// Returns a data URL for embedding the PNG in HTML.
pub fn encode_data_url(png_bytes: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(png_bytes);
    format!("{}{}", PNG_DATA_URL_PREFIX, encoded)
}

/// Inverse of [`encode_data_url`]. `None` when the prefix or payload is malformed.
#[cfg(test)]
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let payload = data_url.strip_prefix(PNG_DATA_URL_PREFIX)?;
    general_purpose::STANDARD.decode(payload).ok()
}
