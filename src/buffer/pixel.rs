use std::sync::Arc;

use crate::color::format::{Format, SampleEncoding};
use crate::foundation::core::Rect;
use crate::foundation::error::{PixgraphError, PixgraphResult};

/// Reference-counted pixel buffer handed between nodes.
///
/// A buffer is written in place only while its handle is unique (`Arc::get_mut`); shared
/// handles are read-only.
pub type SharedBuffer = Arc<PixelBuffer>;

/// Boundary-extension policy for reads outside a buffer's extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Abyss {
    /// Samples outside the extent read as zero.
    None,
    /// Samples outside the extent read as the nearest edge pixel.
    Clamp,
}

/// Rectangular grid of `f32` samples, addressed in absolute plane coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    extent: Rect,
    format: Format,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer covering `extent`.
    pub fn new(extent: Rect, format: Format) -> PixgraphResult<Self> {
        let len = sample_len(extent, &format)?;
        Ok(Self {
            extent,
            format,
            data: vec![0.0; len],
        })
    }

    /// Wrap row-major samples covering `extent`.
    pub fn from_samples(extent: Rect, format: Format, data: Vec<f32>) -> PixgraphResult<Self> {
        let len = sample_len(extent, &format)?;
        if data.len() != len {
            return Err(PixgraphError::validation(format!(
                "buffer of {}x{} {} expects {len} samples, got {}",
                extent.width,
                extent.height,
                format.encoding.name(),
                data.len()
            )));
        }
        Ok(Self {
            extent,
            format,
            data,
        })
    }

    /// Covered rect.
    pub fn extent(&self) -> Rect {
        self.extent
    }

    /// Sample format.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Replace the format tag. The sample layout must not change.
    pub fn set_format(&mut self, format: Format) -> PixgraphResult<()> {
        if !self.format.same_layout(&format) {
            return Err(PixgraphError::validation(format!(
                "cannot re-tag {} buffer as {}",
                self.format, format
            )));
        }
        self.format = format;
        Ok(())
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Row-major samples.
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major samples.
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Size of the sample storage in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        let row = (i64::from(y) - i64::from(self.extent.y)) as usize;
        let col = (i64::from(x) - i64::from(self.extent.x)) as usize;
        (row * self.extent.width as usize + col) * self.channels()
    }

    /// Samples of pixel `(x, y)`, or `None` outside the extent.
    pub fn pixel(&self, x: i32, y: i32) -> Option<&[f32]> {
        if !self.extent.contains_point(x, y) {
            return None;
        }
        let at = self.offset(x, y);
        Some(&self.data[at..at + self.channels()])
    }

    /// Mutable samples of pixel `(x, y)`, or `None` outside the extent.
    pub fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut [f32]> {
        if !self.extent.contains_point(x, y) {
            return None;
        }
        let at = self.offset(x, y);
        let ch = self.channels();
        Some(&mut self.data[at..at + ch])
    }

    /// Row `y` restricted to `[x, x + width)`. The span must lie inside the extent.
    pub(crate) fn row_mut(&mut self, x: i32, y: i32, width: usize) -> &mut [f32] {
        let at = self.offset(x, y);
        let ch = self.channels();
        &mut self.data[at..at + width * ch]
    }

    /// Copy of this buffer in another sample layout. The space tag is kept.
    pub fn converted(&self, encoding: SampleEncoding) -> PixelBuffer {
        let pixels = self.extent.area() as usize;
        let mut data = Vec::with_capacity(pixels * encoding.channels());
        match (self.format.encoding, encoding) {
            (SampleEncoding::YFloat, SampleEncoding::RgbaFloat) => {
                for &y in &self.data {
                    data.extend_from_slice(&[y, y, y, 1.0]);
                }
            }
            (SampleEncoding::RgbaFloat, SampleEncoding::YFloat) => {
                for px in self.data.chunks_exact(4) {
                    data.push(0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]);
                }
            }
            _ => return self.clone(),
        }
        PixelBuffer {
            extent: self.extent,
            format: Format::new(encoding, self.format.space.clone()),
            data,
        }
    }
}

fn sample_len(extent: Rect, format: &Format) -> PixgraphResult<usize> {
    if extent.is_infinite() {
        return Err(PixgraphError::allocation(
            "cannot allocate a buffer over the infinite plane",
        ));
    }
    if extent.is_empty() {
        return Ok(0);
    }
    (extent.width as usize)
        .checked_mul(extent.height as usize)
        .and_then(|px| px.checked_mul(format.channels()))
        .ok_or_else(|| PixgraphError::allocation("buffer size overflow"))
}

/// Copy `dst_rect.width x dst_rect.height` pixels starting at `src_rect`'s origin in `src` to
/// `dst_rect` in `dst`, extending `src` past its extent with `abyss`.
///
/// The part of `dst_rect` outside `dst`'s extent is skipped.
pub fn copy_region(
    src: &PixelBuffer,
    src_rect: Rect,
    dst: &mut PixelBuffer,
    dst_rect: Rect,
    abyss: Abyss,
) -> PixgraphResult<()> {
    if src_rect.width != dst_rect.width || src_rect.height != dst_rect.height {
        return Err(PixgraphError::validation(
            "copy_region expects equally sized source and destination rects",
        ));
    }
    if !src.format.same_layout(&dst.format) {
        return Err(PixgraphError::validation(format!(
            "copy_region between {} and {}",
            src.format, dst.format
        )));
    }
    let Some(clip) = dst_rect.intersect(dst.extent) else {
        return Ok(());
    };

    let ch = src.channels();
    let ox = i64::from(src_rect.x) - i64::from(dst_rect.x);
    let oy = i64::from(src_rect.y) - i64::from(dst_rect.y);
    let se = src.extent;
    let (sx0, sx1) = (i64::from(se.x), i64::from(se.x) + i64::from(se.width));
    let (sy0, sy1) = (i64::from(se.y), i64::from(se.y) + i64::from(se.height));
    let w = clip.width as usize;

    for dy in 0..clip.height {
        let y_dst = clip.y + dy;
        let y_src = i64::from(y_dst) + oy;
        let dst_row = dst.row_mut(clip.x, y_dst, w);
        if se.is_empty() {
            dst_row.fill(0.0);
            continue;
        }
        let sy = match abyss {
            Abyss::Clamp => Some(y_src.clamp(sy0, sy1 - 1)),
            Abyss::None => (sy0..sy1).contains(&y_src).then_some(y_src),
        };
        let Some(sy) = sy else {
            dst_row.fill(0.0);
            continue;
        };
        let sy = sy as i32;

        // Split the row into [left abyss | inside | right abyss] spans.
        let first_src_x = i64::from(clip.x) + ox;
        let lo = (sx0 - first_src_x).clamp(0, w as i64) as usize;
        let hi = (sx1 - first_src_x).clamp(lo as i64, w as i64) as usize;

        if hi > lo {
            let from = src.offset((first_src_x + lo as i64) as i32, sy);
            dst_row[lo * ch..hi * ch].copy_from_slice(&src.data[from..from + (hi - lo) * ch]);
        }
        match abyss {
            Abyss::None => {
                dst_row[..lo * ch].fill(0.0);
                dst_row[hi * ch..].fill(0.0);
            }
            Abyss::Clamp => {
                let left = src.offset(se.x, sy);
                let right = src.offset((sx1 - 1) as i32, sy);
                for px in dst_row[..lo * ch].chunks_exact_mut(ch) {
                    px.copy_from_slice(&src.data[left..left + ch]);
                }
                for px in dst_row[hi * ch..].chunks_exact_mut(ch) {
                    px.copy_from_slice(&src.data[right..right + ch]);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
