//! Image persistence.
//!
//! Two formats are handled natively: uncompressed TIFF with a fixed header
//! ([`tiff`]) and run-length encoded Targa ([`tga`]). Path-based [`load`] and
//! [`save`] pick a codec by extension and hand anything else to the `image`
//! crate.

pub mod tga;
pub mod tiff;

use std::path::Path;

use anyhow::{Context, Result};

use crate::pixels::{PixelBuffer, PixelFormat};

/// Natively handled container.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Codec {
    Tiff,
    Tga,
}

impl Codec {
    /// Codec for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => Some(Codec::Tiff),
            "tga" => Some(Codec::Tga),
            _ => None,
        }
    }

    pub fn for_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    pub fn decode(self, bytes: &[u8]) -> crate::error::DrawResult<PixelBuffer> {
        match self {
            Codec::Tiff => tiff::decode(bytes),
            Codec::Tga => tga::decode(bytes),
        }
    }

    pub fn encode(self, buf: &PixelBuffer) -> crate::error::DrawResult<Vec<u8>> {
        match self {
            Codec::Tiff => tiff::encode(buf),
            Codec::Tga => tga::encode(buf),
        }
    }
}

/// Reads an image file.
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    match Codec::for_path(path) {
        Some(codec) => {
            let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let buf = codec
                .decode(&bytes)
                .with_context(|| format!("failed to decode {}", path.display()))?;
            log::debug!("loaded {} ({}x{}, {:?})", path.display(), buf.width(), buf.height(), codec);
            Ok(buf)
        }
        None => {
            let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(PixelBuffer::from_dynamic_image(&img))
        }
    }
}

/// Writes an image file; the extension selects the format.
pub fn save(path: impl AsRef<Path>, buf: &PixelBuffer) -> Result<()> {
    let path = path.as_ref();
    match Codec::for_path(path) {
        Some(codec) => {
            let bytes = codec
                .encode(buf)
                .with_context(|| format!("failed to encode {}", path.display()))?;
            std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let rgba = image::DynamicImage::ImageRgba8(buf.to_rgba_image());
            // Formats without an alpha channel (JPEG) reject RGBA input.
            let img = if buf.format() == PixelFormat::Rgb || !keeps_alpha(path) {
                image::DynamicImage::ImageRgb8(rgba.to_rgb8())
            } else {
                rgba
            };
            img.save(path).with_context(|| format!("failed to write {}", path.display()))
        }
    }
}

fn keeps_alpha(path: &Path) -> bool {
    !matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("jpg" | "jpeg" | "bmp")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("easel-codec-{}-{name}", std::process::id()))
    }

    fn sample(format: PixelFormat) -> PixelBuffer {
        let pixels = (0..20u32).map(|i| format.from_argb(0xFF00_0000 | i * 0x0009_0705)).collect();
        PixelBuffer::from_pixels(5, 4, format, pixels).unwrap()
    }

    #[test]
    fn extension_selects_codec() {
        assert_eq!(Codec::for_path(Path::new("a/b.TIF")), Some(Codec::Tiff));
        assert_eq!(Codec::for_path(Path::new("x.tga")), Some(Codec::Tga));
        assert_eq!(Codec::for_path(Path::new("x.png")), None);
        assert_eq!(Codec::for_path(Path::new("noext")), None);
    }

    #[test]
    fn native_roundtrip_through_files() {
        for (name, format) in [("a.tif", PixelFormat::Rgb), ("b.tga", PixelFormat::Argb)] {
            let path = scratch_path(name);
            let src = sample(format);
            save(&path, &src).unwrap();
            let back = load(&path).unwrap();
            assert_eq!(back.pixels(), src.pixels());
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn png_goes_through_image_crate() {
        let path = scratch_path("c.png");
        let src = sample(PixelFormat::Rgb);
        save(&path, &src).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back.format(), PixelFormat::Rgb);
        assert_eq!(back.pixels(), src.pixels());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_error_names_path() {
        let err = load(scratch_path("missing.tga")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.tga"));
    }
}
