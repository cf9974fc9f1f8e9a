//! Targa, run-length encoded on write; raw and RLE accepted on read.

use crate::error::{DrawError, DrawResult};
use crate::pixels::{PixelBuffer, PixelFormat};

pub const HEADER_LEN: usize = 18;

const TYPE_TRUE_COLOR: u8 = 2;
const TYPE_GRAY: u8 = 3;
const TYPE_RLE_TRUE_COLOR: u8 = 10;
const TYPE_RLE_GRAY: u8 = 11;

/// Descriptor bit: rows stored top to bottom.
const TOP_LEFT: u8 = 0x20;
const MAX_PACKET: usize = 128;

fn bytes_per_pixel(format: PixelFormat) -> usize {
    match format {
        PixelFormat::Alpha => 1,
        PixelFormat::Rgb => 3,
        PixelFormat::Argb => 4,
    }
}

fn write_pixel(out: &mut Vec<u8>, format: PixelFormat, p: u32) {
    match format {
        PixelFormat::Alpha => out.push(p as u8),
        PixelFormat::Rgb => out.extend_from_slice(&[p as u8, (p >> 8) as u8, (p >> 16) as u8]),
        PixelFormat::Argb => {
            out.extend_from_slice(&[p as u8, (p >> 8) as u8, (p >> 16) as u8, (p >> 24) as u8])
        }
    }
}

fn read_pixel(b: &[u8], format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Alpha => u32::from(b[0]),
        PixelFormat::Rgb => 0xFF00_0000 | u32::from(b[2]) << 16 | u32::from(b[1]) << 8 | u32::from(b[0]),
        PixelFormat::Argb => {
            u32::from(b[3]) << 24 | u32::from(b[2]) << 16 | u32::from(b[1]) << 8 | u32::from(b[0])
        }
    }
}

// ── encode ────────────────────────────────────────────────────────────────

/// Encodes with RLE, top-left origin. Output is a pure function of the
/// pixels, so decoding and re-encoding reproduces it byte for byte.
pub fn encode(buf: &PixelBuffer) -> DrawResult<Vec<u8>> {
    let (width, height) = (buf.width(), buf.height());
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(DrawError::invalid_argument(format!(
            "{width}x{height} does not fit a 16-bit tga header"
        )));
    };
    let format = buf.format();
    let (kind, depth, descriptor) = match format {
        PixelFormat::Alpha => (TYPE_RLE_GRAY, 8, TOP_LEFT | 8),
        PixelFormat::Rgb => (TYPE_RLE_TRUE_COLOR, 24, TOP_LEFT),
        PixelFormat::Argb => (TYPE_RLE_TRUE_COLOR, 32, TOP_LEFT | 8),
    };

    let mut out = Vec::with_capacity(HEADER_LEN + buf.pixels().len() * bytes_per_pixel(format) / 2);
    out.extend_from_slice(&[0, 0, kind, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&w16.to_le_bytes());
    out.extend_from_slice(&h16.to_le_bytes());
    out.extend_from_slice(&[depth, descriptor]);

    let px = buf.pixels();
    let n = px.len();
    let starts_run = |i: usize| i + 1 < n && px[i] == px[i + 1];
    let mut i = 0;
    while i < n {
        if starts_run(i) {
            let mut len = 2;
            while i + len < n && len < MAX_PACKET && px[i + len] == px[i] {
                len += 1;
            }
            out.push(0x80 | (len - 1) as u8);
            write_pixel(&mut out, format, px[i]);
            i += len;
        } else {
            let mut len = 1;
            while i + len < n && len < MAX_PACKET && !starts_run(i + len) {
                len += 1;
            }
            out.push((len - 1) as u8);
            for &p in &px[i..i + len] {
                write_pixel(&mut out, format, p);
            }
            i += len;
        }
    }
    Ok(out)
}

// ── decode ────────────────────────────────────────────────────────────────

pub fn decode(bytes: &[u8]) -> DrawResult<PixelBuffer> {
    if bytes.len() < HEADER_LEN {
        return Err(DrawError::format("tga header length", HEADER_LEN, bytes.len()));
    }
    let id_len = usize::from(bytes[0]);
    if bytes[1] != 0 {
        return Err(DrawError::format("tga colormap type", 0, bytes[1]));
    }
    let kind = bytes[2];
    let depth = bytes[16];
    let descriptor = bytes[17];
    let (format, rle) = match (kind, depth) {
        (TYPE_TRUE_COLOR | TYPE_RLE_TRUE_COLOR, 24) => (PixelFormat::Rgb, kind == TYPE_RLE_TRUE_COLOR),
        (TYPE_TRUE_COLOR | TYPE_RLE_TRUE_COLOR, 32) => (PixelFormat::Argb, kind == TYPE_RLE_TRUE_COLOR),
        (TYPE_GRAY | TYPE_RLE_GRAY, 8) => (PixelFormat::Alpha, kind == TYPE_RLE_GRAY),
        (TYPE_TRUE_COLOR | TYPE_RLE_TRUE_COLOR, d) => {
            return Err(DrawError::format("tga true-color depth", "24 or 32", d));
        }
        (TYPE_GRAY | TYPE_RLE_GRAY, d) => return Err(DrawError::format("tga gray depth", 8, d)),
        (k, _) => return Err(DrawError::format("tga image type", "2, 3, 10 or 11", k)),
    };
    let width = usize::from(u16::from_le_bytes([bytes[12], bytes[13]]));
    let height = usize::from(u16::from_le_bytes([bytes[14], bytes[15]]));
    let total = width * height;
    let bpp = bytes_per_pixel(format);

    let body = bytes.get(HEADER_LEN + id_len..).unwrap_or(&[]);
    if !rle && body.len() < total * bpp {
        return Err(DrawError::format(
            "tga pixel count",
            format!("{total} ({width}x{height})"),
            body.len() / bpp,
        ));
    }
    // RLE bodies expand; reserve no more than the body length.
    let mut pixels = Vec::with_capacity(total.min(body.len()));
    if rle {
        let mut at = 0;
        while pixels.len() < total {
            let Some(&control) = body.get(at) else { break };
            at += 1;
            let len = usize::from(control & 0x7F) + 1;
            if pixels.len() + len > total {
                return Err(DrawError::format("tga packet length", total - pixels.len(), len));
            }
            if control & 0x80 != 0 {
                let Some(raw) = body.get(at..at + bpp) else { break };
                let p = read_pixel(raw, format);
                pixels.extend(std::iter::repeat_n(p, len));
                at += bpp;
            } else {
                let Some(raw) = body.get(at..at + len * bpp) else { break };
                pixels.extend(raw.chunks_exact(bpp).map(|c| read_pixel(c, format)));
                at += len * bpp;
            }
        }
    } else if let Some(raw) = body.get(..total * bpp) {
        pixels.extend(raw.chunks_exact(bpp).map(|c| read_pixel(c, format)));
    }
    if pixels.len() != total {
        return Err(DrawError::format(
            "tga pixel count",
            format!("{total} ({width}x{height})"),
            pixels.len(),
        ));
    }

    if descriptor & TOP_LEFT == 0 {
        flip_rows(&mut pixels, width);
    }
    PixelBuffer::from_pixels(width, height, format, pixels)
}

fn flip_rows(pixels: &mut [u32], width: usize) {
    if width == 0 {
        return;
    }
    let rows = pixels.len() / width;
    for y in 0..rows / 2 {
        let (top, bottom) = pixels.split_at_mut((rows - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Mixes repeat runs, literal runs and a run longer than one packet.
    fn mixed(format: PixelFormat) -> PixelBuffer {
        let mut pixels = vec![0x80FF_0000; 5];
        pixels.extend([0x1100_0001, 0x2200_0002, 0x3300_0003]);
        pixels.extend(vec![0xFF00_FF00; 150]);
        pixels.extend([0x4400_0004, 0x4400_0004, 0x5500_0005]);
        let pixels = pixels.into_iter().map(|p| format.from_argb(p)).collect();
        PixelBuffer::from_pixels(163, 1, format, pixels).unwrap()
    }

    // ── packets ───────────────────────────────────────────────────────────

    #[test]
    fn header_and_packets() {
        let bytes = encode(&mixed(PixelFormat::Rgb)).unwrap();
        assert_eq!(bytes[2], TYPE_RLE_TRUE_COLOR);
        assert_eq!(&bytes[12..18], &[163, 0, 1, 0, 24, 0x20]);
        // 5 × red, then three literals.
        assert_eq!(&bytes[18..22], &[0x84, 0x00, 0x00, 0xFF]);
        assert_eq!(bytes[22], 0x02);
        // 150 × green split 128 + 22.
        assert_eq!(bytes[32], 0xFF);
        assert_eq!(bytes[36], 0x80 | 21);
    }

    #[test]
    fn literal_packet_caps_at_128() {
        let pixels = (0..300u32).map(|i| 0xFF00_0000 | i).collect();
        let buf = PixelBuffer::from_pixels(300, 1, PixelFormat::Rgb, pixels).unwrap();
        let bytes = encode(&buf).unwrap();
        assert_eq!(bytes[18], 127);
        assert_eq!(bytes[18 + 1 + 128 * 3], 127);
        assert_eq!(decode(&bytes).unwrap().pixels(), buf.pixels());
    }

    #[test]
    fn reencode_is_byte_identical() {
        for format in [PixelFormat::Rgb, PixelFormat::Argb, PixelFormat::Alpha] {
            let bytes = encode(&mixed(format)).unwrap();
            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded.format(), format);
            assert_eq!(decoded.pixels(), mixed(format).pixels());
            assert_eq!(encode(&decoded).unwrap(), bytes, "{format:?}");
        }
    }

    // ── decoder extras ────────────────────────────────────────────────────

    #[test]
    fn raw_bottom_left_with_image_id() {
        // 1x2 gray, uncompressed, 3-byte id, bottom row first.
        let mut bytes = vec![3, 0, TYPE_GRAY, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2, 0, 8, 0];
        bytes.extend_from_slice(b"abc");
        bytes.extend_from_slice(&[0x10, 0x20]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.format(), PixelFormat::Alpha);
        assert_eq!(img.pixels(), &[0x20, 0x10]);
    }

    #[test]
    fn rejects_colormap_and_bad_depth() {
        let mut bytes = encode(&mixed(PixelFormat::Rgb)).unwrap();
        bytes[1] = 1;
        assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::Format);
        let mut bytes = encode(&mixed(PixelFormat::Rgb)).unwrap();
        bytes[16] = 16;
        assert!(decode(&bytes).is_err());
        let mut bytes = encode(&mixed(PixelFormat::Rgb)).unwrap();
        bytes[2] = 1;
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn truncated_body_reports_counts() {
        let bytes = encode(&mixed(PixelFormat::Argb)).unwrap();
        let err = decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("163"));
    }

    #[test]
    fn oversized_header_without_body_is_a_format_error() {
        for (kind, depth) in [
            (TYPE_RLE_TRUE_COLOR, 32),
            (TYPE_TRUE_COLOR, 32),
            (TYPE_RLE_GRAY, 8),
            (TYPE_GRAY, 8),
        ] {
            let bytes = [0, 0, kind, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, depth, 0x20];
            let err = decode(&bytes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "type {kind}");
        }
    }

    #[test]
    fn short_header_is_a_format_error() {
        let bytes = encode(&mixed(PixelFormat::Rgb)).unwrap();
        assert_eq!(decode(&bytes[..HEADER_LEN - 1]).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(decode(&[]).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn flip_swaps_rows() {
        let mut px = vec![1, 2, 3, 4, 5, 6];
        flip_rows(&mut px, 2);
        assert_eq!(px, vec![5, 6, 3, 4, 1, 2]);
    }
}
