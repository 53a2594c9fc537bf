//! Turning fetched image bytes into something the PDF definition can embed.
//!
//! pdfmake embeds PNG and JPEG through base64 data URLs and SVG through raw
//! markup. Everything else is reported as unsupported so the caller can fall
//! back to a placeholder.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Image formats recognised when sniffing fetched bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    Svg,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "webp" => Self::Webp,
            "svg" => Self::Svg,
            _ => Self::Unknown,
        }
    }

    /// Detect image format from magic bytes
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
            return Self::Webp;
        }

        if looks_like_svg(data) {
            return Self::Svg;
        }

        Self::Unknown
    }

    /// Detect from a MIME type such as `image/svg+xml; charset=utf-8`
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/bmp" => Self::Bmp,
            "image/webp" => Self::Webp,
            "image/svg+xml" => Self::Svg,
            _ => Self::Unknown,
        }
    }

    /// Get MIME type for this image format
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Svg => "image/svg+xml",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Raster formats pdfmake can embed from a data URL
    #[must_use]
    pub fn is_pdf_raster(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

/// SVG has no magic number; skip BOM, whitespace, processing instructions,
/// comments and the doctype, then look for the root tag within the first
/// few kilobytes.
fn looks_like_svg(data: &[u8]) -> bool {
    let head = data.get(..data.len().min(4096)).unwrap_or(data);
    let text = String::from_utf8_lossy(head);
    let mut rest = text.trim_start_matches('\u{feff}').trim_start();
    loop {
        let skipped = if let Some(after) = rest.strip_prefix("<?") {
            after.split_once("?>")
        } else if let Some(after) = rest.strip_prefix("<!--") {
            after.split_once("-->")
        } else if let Some(after) = rest.strip_prefix("<!DOCTYPE") {
            after.split_once('>')
        } else {
            break;
        };
        match skipped {
            Some((_, after)) => rest = after.trim_start(),
            None => return false,
        }
    }
    rest.starts_with("<svg")
}

/// Base64-encoded raster image
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    /// MIME type of the image (e.g., "image/png", "image/jpeg")
    pub mime_type: String,
    /// Base64-encoded image data
    pub data: String,
}

impl EmbeddedImage {
    #[must_use]
    pub fn from_bytes(format: ImageFormat, bytes: &[u8]) -> Self {
        Self {
            mime_type: format.mime_type().to_string(),
            data: BASE64.encode(bytes),
        }
    }

    /// `data:<mime>;base64,<data>`
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Outcome of resolving one cell's image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// PNG or JPEG, ready to embed
    Embedded(EmbeddedImage),
    /// SVG markup
    Svg(String),
    /// No URL, or the image could not be fetched/decoded
    Missing,
}

impl ResolvedImage {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Classify fetched bytes.
///
/// # Errors
/// Returns `ImageFetch` for empty bodies, undecodable SVG text, and formats
/// the PDF export cannot embed.
pub fn decode_image(url: &str, bytes: &[u8]) -> Result<ResolvedImage> {
    if bytes.is_empty() {
        return Err(BoardError::image_fetch(url, "empty response body"));
    }

    let format = ImageFormat::from_magic_bytes(bytes);
    if format == ImageFormat::Unknown {
        // Bytes decide the format; the extension only sharpens the error.
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = path.rsplit_once('.').map_or("", |(_, ext)| ext);
        let claimed = ImageFormat::from_extension(ext);
        if claimed != ImageFormat::Unknown {
            return Err(BoardError::image_fetch(
                url,
                format!("content does not match its .{ext} extension"),
            ));
        }
    }

    match format {
        ImageFormat::Svg => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| BoardError::image_fetch(url, format!("SVG is not UTF-8: {e}")))?;
            Ok(ResolvedImage::Svg(text.to_string()))
        }
        f if f.is_pdf_raster() => Ok(ResolvedImage::Embedded(EmbeddedImage::from_bytes(f, bytes))),
        other => Err(BoardError::image_fetch(
            url,
            format!("unsupported image format {}", other.mime_type()),
        )),
    }
}

/// Decode a `data:` URL without going to the network.
///
/// # Errors
/// Returns `ImageFetch` for malformed URLs or payloads, see [`decode_image`].
pub fn decode_data_url(url: &str) -> Result<ResolvedImage> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| BoardError::image_fetch(url, "not a data URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| BoardError::image_fetch(url, "missing data URL payload"))?;

    let is_base64 = meta.ends_with(";base64");
    let bytes = if is_base64 {
        BASE64
            .decode(payload.trim())
            .map_err(|e| BoardError::image_fetch(url, e))?
    } else {
        percent_decode_str(payload).collect::<Vec<u8>>()
    };

    // Trust the declared type when the bytes are ambiguous (e.g. SVG text).
    let declared = ImageFormat::from_mime(meta.trim_end_matches(";base64"));
    if declared == ImageFormat::Svg {
        let text = String::from_utf8(bytes)
            .map_err(|e| BoardError::image_fetch(url, format!("SVG is not UTF-8: {e}")))?;
        return Ok(ResolvedImage::Svg(text));
    }
    decode_image(url, &bytes)
}
