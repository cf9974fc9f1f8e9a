//! Uncompressed big-endian TIFF with a fixed single-strip RGB header.

use crate::error::{DrawError, DrawResult};
use crate::pixels::{PixelBuffer, PixelFormat};

pub const HEADER_LEN: usize = 768;

/// Meaningful prefix of the header; the rest is zero padding.
const TEMPLATE: [u8; 128] = [
    77, 77, 0, 42, 0, 0, 0, 8, 0, 9, // byte order, magic, IFD offset, 9 entries
    0, 254, 0, 4, 0, 0, 0, 1, 0, 0, 0, 0, // NewSubfileType
    1, 0, 0, 3, 0, 0, 0, 1, 0, 0, 0, 0, // ImageWidth
    1, 1, 0, 3, 0, 0, 0, 1, 0, 0, 0, 0, // ImageLength
    1, 2, 0, 3, 0, 0, 0, 3, 0, 0, 0, 122, // BitsPerSample -> offset 122
    1, 6, 0, 3, 0, 0, 0, 1, 0, 2, 0, 0, // PhotometricInterpretation = RGB
    1, 17, 0, 4, 0, 0, 0, 1, 0, 0, 3, 0, // StripOffsets = 768
    1, 21, 0, 3, 0, 0, 0, 1, 0, 3, 0, 0, // SamplesPerPixel = 3
    1, 22, 0, 3, 0, 0, 0, 1, 0, 0, 0, 0, // RowsPerStrip
    1, 23, 0, 4, 0, 0, 0, 1, 0, 0, 0, 0, // StripByteCounts
    0, 0, 0, 0, // next IFD
    0, 8, 0, 8, 0, 8, // 8 bits per sample
];

const WIDTH_AT: usize = 30;
const HEIGHT_AT: usize = 42;
const ROWS_PER_STRIP_AT: usize = 102;
const BYTE_COUNT_AT: usize = 114;

#[inline]
fn variable(i: usize) -> bool {
    matches!(
        i,
        WIDTH_AT..=31 | HEIGHT_AT..=43 | ROWS_PER_STRIP_AT..=103 | BYTE_COUNT_AT..=117
    )
}

#[inline]
fn template_byte(i: usize) -> u8 {
    TEMPLATE.get(i).copied().unwrap_or(0)
}

#[inline]
fn be16(bytes: &[u8], at: usize) -> usize {
    usize::from(u16::from_be_bytes([bytes[at], bytes[at + 1]]))
}

/// Decodes to an RGB buffer.
pub fn decode(bytes: &[u8]) -> DrawResult<PixelBuffer> {
    if bytes.len() < HEADER_LEN {
        return Err(DrawError::format("tiff header length", HEADER_LEN, bytes.len()));
    }
    if let Some(i) = (0..HEADER_LEN).find(|&i| !variable(i) && bytes[i] != template_byte(i)) {
        return Err(DrawError::format(
            "tiff header",
            format!("byte {i} = {}", template_byte(i)),
            format!("byte {i} = {}", bytes[i]),
        ));
    }

    let width = be16(bytes, WIDTH_AT);
    let height = be16(bytes, HEIGHT_AT);
    let rows = be16(bytes, ROWS_PER_STRIP_AT);
    if rows != height {
        return Err(DrawError::format("tiff rows per strip", height, rows));
    }
    let count = u32::from_be_bytes([
        bytes[BYTE_COUNT_AT],
        bytes[BYTE_COUNT_AT + 1],
        bytes[BYTE_COUNT_AT + 2],
        bytes[BYTE_COUNT_AT + 3],
    ]) as usize;
    let expected = width * height * 3;
    if count != expected {
        return Err(DrawError::format(
            "tiff strip byte count",
            format!("{expected} ({width}x{height}x3)"),
            count,
        ));
    }
    let body = &bytes[HEADER_LEN..];
    if body.len() < expected {
        return Err(DrawError::format("tiff pixel data length", expected, body.len()));
    }

    let pixels = body[..expected]
        .chunks_exact(3)
        .map(|c| 0xFF00_0000 | u32::from(c[0]) << 16 | u32::from(c[1]) << 8 | u32::from(c[2]))
        .collect();
    PixelBuffer::from_pixels(width, height, PixelFormat::Rgb, pixels)
}

/// Encodes the RGB part of any buffer (alpha-only images as gray coverage).
pub fn encode(buf: &PixelBuffer) -> DrawResult<Vec<u8>> {
    let (width, height) = (buf.width(), buf.height());
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(DrawError::invalid_argument(format!(
            "{width}x{height} does not fit a 16-bit tiff header"
        )));
    };
    let count = width * height * 3;

    let mut out = vec![0u8; HEADER_LEN + count];
    out[..TEMPLATE.len()].copy_from_slice(&TEMPLATE);
    out[WIDTH_AT..WIDTH_AT + 2].copy_from_slice(&w16.to_be_bytes());
    out[HEIGHT_AT..HEIGHT_AT + 2].copy_from_slice(&h16.to_be_bytes());
    out[ROWS_PER_STRIP_AT..ROWS_PER_STRIP_AT + 2].copy_from_slice(&h16.to_be_bytes());
    out[BYTE_COUNT_AT..BYTE_COUNT_AT + 4].copy_from_slice(&(count as u32).to_be_bytes());

    let alpha_only = buf.format() == PixelFormat::Alpha;
    for (dst, &p) in out[HEADER_LEN..].chunks_exact_mut(3).zip(buf.pixels()) {
        if alpha_only {
            dst.fill(p as u8);
        } else {
            dst.copy_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
    }
    Ok(out)
}
