// this_file: crates/vecta-resolve/src/payload.rs

//! Getting bytes out of `data:` URIs and learning what they are
//!
//! Decoding stops at the container: the format and pixel size are read from
//! the header, the pixels themselves are left for the host or runtime layer.

use std::io::Cursor;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use vecta_core::{ImageError, InlineImage};

/// Largest payload accepted from a document (64MB)
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Standard alphabet, padding optional; documents in the wild drop it often
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// What the header of an image payload says about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedImage {
    pub mime: String,
    pub width: u32,
    pub height: u32,
}

/// Decodes the payload of a `data:` URI
///
/// Base64 payloads may contain whitespace (line-wrapped documents). Anything
/// else is percent-decoded.
pub fn decode_inline(inline: &InlineImage, limit: usize) -> Result<Vec<u8>, ImageError> {
    let bytes = if inline.base64 {
        let compact: String = inline
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        check_size(compact.len() / 4 * 3, limit)?;
        LENIENT_BASE64
            .decode(compact.as_bytes())
            .map_err(|e| ImageError::Decode(format!("base64: {e}")))?
    } else {
        percent_decode(&inline.payload)?
    };

    check_size(bytes.len(), limit)?;
    if bytes.is_empty() {
        return Err(ImageError::Decode("empty payload".to_string()));
    }
    Ok(bytes)
}

/// Identifies the format and reads the pixel size
pub fn probe(bytes: &[u8]) -> Result<ProbedImage, ImageError> {
    let format = image::guess_format(bytes)
        .map_err(|e| ImageError::UnsupportedFormat(e.to_string()))?;

    let (width, height) = image::ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| match e {
            image::ImageError::Unsupported(e) => ImageError::UnsupportedFormat(e.to_string()),
            other => ImageError::Decode(other.to_string()),
        })?;

    Ok(ProbedImage {
        mime: format.to_mime_type().to_string(),
        width,
        height,
    })
}

pub(crate) fn check_size(size: usize, limit: usize) -> Result<(), ImageError> {
    if size > limit {
        return Err(ImageError::TooLarge { size, limit });
    }
    Ok(())
}

fn percent_decode(payload: &str) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::with_capacity(payload.len());
    let mut bytes = payload.bytes();
    while let Some(b) = bytes.next() {
        if b != b'%' {
            out.push(b);
            continue;
        }
        let hi = bytes.next().and_then(hex_value);
        let lo = bytes.next().and_then(hex_value);
        match (hi, lo) {
            (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
            _ => return Err(ImageError::InvalidDataUri("bad percent escape".to_string())),
        }
    }
    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
