use std::io::Cursor;
use std::path::Path;

use image::ImageDecoder;
use image::codecs::jpeg::JpegDecoder;
use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
enum ColorSpace {
    Gray,
    Rgb,
}

/// A page background, measured and encoded, ready to become an image XObject.
pub(crate) struct BackgroundImage {
    pub(crate) pixel_width: u32,
    pub(crate) pixel_height: u32,
    data: Vec<u8>,
    filter: Filter,
    color: ColorSpace,
}

impl BackgroundImage {
    pub(crate) fn load(path: &Path, compression_level: u8) -> Result<Self, Error> {
        let t0 = std::time::Instant::now();
        let bytes = std::fs::read(path).map_err(|e| Error::image(path, e))?;
        let format = image::guess_format(&bytes).map_err(|e| Error::image(path, e))?;

        let bg = match format {
            image::ImageFormat::Jpeg => match jpeg_passthrough(&bytes) {
                Some(bg) => bg,
                None => decode_and_deflate(path, &bytes, compression_level)?,
            },
            _ => decode_and_deflate(path, &bytes, compression_level)?,
        };

        if bg.pixel_width == 0 || bg.pixel_height == 0 {
            return Err(Error::image(path, "image has zero width or height"));
        }

        log::debug!(
            "Background {}: {}x{} {:?} {:?}, {} bytes in {:.1}ms",
            path.display(),
            bg.pixel_width,
            bg.pixel_height,
            format,
            bg.color,
            bg.data.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(bg)
    }

    pub(crate) fn write_xobject(&self, pdf: &mut Pdf, xobj_ref: Ref) {
        let mut xobj = pdf.image_xobject(xobj_ref, &self.data);
        xobj.filter(self.filter);
        xobj.width(self.pixel_width as i32);
        xobj.height(self.pixel_height as i32);
        match self.color {
            ColorSpace::Gray => xobj.color_space().device_gray(),
            ColorSpace::Rgb => xobj.color_space().device_rgb(),
        };
        xobj.bits_per_component(8);
    }
}

/// Component count from the first SOF segment, or None if there is none
/// before the scan data.
fn sof_components(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 1 < bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let len = u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]) as usize;
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        pos += 2 + len;
    }
    None
}

/// Gray and RGB JPEGs embed as-is. Anything else (CMYK, YCCK, 16-bit)
/// returns None and gets re-encoded. The decoder reports CMYK as RGB, so the
/// frame header decides.
fn jpeg_passthrough(bytes: &[u8]) -> Option<BackgroundImage> {
    let components = sof_components(bytes)?;
    let decoder = JpegDecoder::new(Cursor::new(bytes)).ok()?;
    let (w, h) = decoder.dimensions();
    let color = match (components, decoder.color_type()) {
        (1, image::ColorType::L8) => ColorSpace::Gray,
        (3, image::ColorType::Rgb8) => ColorSpace::Rgb,
        _ => return None,
    };
    Some(BackgroundImage {
        pixel_width: w,
        pixel_height: h,
        data: bytes.to_vec(),
        filter: Filter::DctDecode,
        color,
    })
}

fn decode_and_deflate(path: &Path, bytes: &[u8], level: u8) -> Result<BackgroundImage, Error> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::image(path, e))?;
    let (w, h) = (decoded.width(), decoded.height());
    let (raw, color) = if decoded.color().has_color() {
        (decoded.to_rgb8().into_raw(), ColorSpace::Rgb)
    } else {
        (decoded.to_luma8().into_raw(), ColorSpace::Gray)
    };
    let data = miniz_oxide::deflate::compress_to_vec_zlib(&raw, level);
    Ok(BackgroundImage {
        pixel_width: w,
        pixel_height: h,
        data,
        filter: Filter::FlateDecode,
        color,
    })
}
