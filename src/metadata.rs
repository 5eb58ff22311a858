//! Best-effort EXIF carry-over for JPEG output.
//!
//! The encoder writes `SOI`, `APP0` (JFIF) and then the frame. The source
//! EXIF block is inserted as an `APP1` segment right after `APP0`, where
//! readers expect it. Nothing in here returns an error: when the block
//! cannot be embedded the caller simply keeps the plain encoded bytes.

mod markers {
    pub const PREFIX: u8 = 0xFF;
    pub const SOI: u8 = 0xD8;
    pub const EOI: u8 = 0xD9;
    pub const SOS: u8 = 0xDA;
    pub const APP0: u8 = 0xE0;
    pub const APP1: u8 = 0xE1;
}

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Segment length field counts itself, so the payload limit is 65533 bytes.
const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

/// Returns `jpeg` with `exif` embedded as an APP1 segment.
///
/// `exif` may or may not start with the `Exif\0\0` identifier; raw TIFF
/// payloads get it prepended. Returns `None` when `jpeg` is not a JPEG
/// stream, when `exif` is empty, or when it does not fit in one segment.
pub fn embed_exif(jpeg: &[u8], exif: &[u8]) -> Option<Vec<u8>> {
    if jpeg.len() < 4 || jpeg[0] != markers::PREFIX || jpeg[1] != markers::SOI {
        return None;
    }

    let tiff = exif.strip_prefix(EXIF_HEADER).unwrap_or(exif);
    if tiff.is_empty() {
        return None;
    }

    let payload_len = EXIF_HEADER.len() + tiff.len();
    if payload_len > MAX_SEGMENT_PAYLOAD {
        return None;
    }
    let length = u16::try_from(payload_len + 2).ok()?;

    let insert_at = insertion_point(jpeg)?;

    let mut output = Vec::with_capacity(jpeg.len() + payload_len + 4);
    output.extend_from_slice(&jpeg[..insert_at]);
    output.extend_from_slice(&[markers::PREFIX, markers::APP1]);
    output.extend_from_slice(&length.to_be_bytes());
    output.extend_from_slice(EXIF_HEADER);
    output.extend_from_slice(tiff);
    output.extend_from_slice(&jpeg[insert_at..]);
    Some(output)
}

/// Whether the stream already carries an EXIF APP1 segment before the scan.
pub fn has_exif_segment(jpeg: &[u8]) -> bool {
    segments(jpeg).any(|(marker, body)| marker == markers::APP1 && body.starts_with(EXIF_HEADER))
}

/// Offset right after SOI and a leading APP0, if present.
fn insertion_point(jpeg: &[u8]) -> Option<usize> {
    let mut pos = 2;
    if jpeg.get(pos) == Some(&markers::PREFIX) && jpeg.get(pos + 1) == Some(&markers::APP0) {
        let len_bytes = jpeg.get(pos + 2..pos + 4)?;
        let length = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        pos += 2 + length;
        if pos > jpeg.len() {
            return None;
        }
    }
    Some(pos)
}

/// Iterates `(marker, body)` header segments up to the start of scan.
fn segments<'a>(jpeg: &'a [u8]) -> impl Iterator<Item = (u8, &'a [u8])> + 'a {
    let valid = jpeg.len() >= 4 && jpeg[0] == markers::PREFIX && jpeg[1] == markers::SOI;
    let mut pos = if valid { 2 } else { jpeg.len() };

    std::iter::from_fn(move || {
        if pos + 4 > jpeg.len() || jpeg[pos] != markers::PREFIX {
            return None;
        }
        let marker = jpeg[pos + 1];
        if marker == markers::SOS || marker == markers::EOI {
            return None;
        }
        let length = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        if length < 2 || pos + 2 + length > jpeg.len() {
            return None;
        }
        let body = &jpeg[pos + 4..pos + 2 + length];
        pos += 2 + length;
        Some((marker, body))
    })
}
