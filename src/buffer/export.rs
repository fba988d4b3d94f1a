use crate::buffer::pixel::PixelBuffer;
use crate::color::format::SampleEncoding;
use crate::foundation::error::{PixgraphError, PixgraphResult};

/// Quantize a buffer to straight-alpha RGBA8. Luma buffers become opaque gray.
pub fn to_rgba8(buffer: &PixelBuffer) -> PixgraphResult<image::RgbaImage> {
    let extent = buffer.extent();
    let (w, h) = (extent.width.max(0) as u32, extent.height.max(0) as u32);
    let mut bytes = Vec::with_capacity((w as usize) * (h as usize) * 4);
    match buffer.format().encoding {
        SampleEncoding::YFloat => {
            for &y in buffer.samples() {
                let v = quantize(y);
                bytes.extend_from_slice(&[v, v, v, 255]);
            }
        }
        SampleEncoding::RgbaFloat => {
            bytes.extend(buffer.samples().iter().map(|s| quantize(*s)));
        }
    }
    image::RgbaImage::from_raw(w, h, bytes)
        .ok_or_else(|| PixgraphError::validation("rgba8 export size mismatch"))
}

fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/export.rs"]
mod tests;
