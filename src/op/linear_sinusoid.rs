use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::op::property;

/// Largest accepted `supersampling` exponent.
pub const MAX_SUPERSAMPLING: u32 = 4;

/// Columns between exact anchors of the per-pixel walk. Anchors sit on a fixed grid so the walk,
/// and its rounding, does not depend on how the output is tiled.
const ANCHOR_STRIDE: i32 = 64;

/// Parameters of the linear-sinusoid generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearSinusoidParams {
    /// Period along the x axis, in pixels.
    pub x_period: f64,
    /// Period along the y axis, in pixels.
    pub y_period: f64,
    /// Amplitude of the x wave.
    pub x_amplitude: f64,
    /// Amplitude of the y wave.
    pub y_amplitude: f64,
    /// Phase of the x wave, in radians.
    pub x_phase: f64,
    /// Phase of the y wave, in radians.
    pub y_phase: f64,
    /// Angle between the two axes, in degrees.
    pub angle: f64,
    /// Value added before the waves are subtracted.
    pub offset: f64,
    /// Power applied to the summed value.
    pub exponent: f64,
    /// Pattern origin, x.
    pub x_offset: f64,
    /// Pattern origin, y.
    pub y_offset: f64,
    /// Rotation of the whole pattern, in degrees.
    pub rotation: f64,
    /// Anti-aliasing level: `2^s x 2^s` sub-samples per pixel.
    pub supersampling: u32,
}

impl Default for LinearSinusoidParams {
    fn default() -> Self {
        Self {
            x_period: 256.0,
            y_period: 256.0,
            x_amplitude: 0.25,
            y_amplitude: 0.25,
            x_phase: 0.0,
            y_phase: 0.0,
            angle: 90.0,
            offset: 0.5,
            exponent: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
            rotation: 0.0,
            supersampling: 0,
        }
    }
}

impl LinearSinusoidParams {
    /// Check ranges.
    pub fn validate(&self) -> PixgraphResult<()> {
        let finite = [
            ("x_period", self.x_period),
            ("y_period", self.y_period),
            ("x_amplitude", self.x_amplitude),
            ("y_amplitude", self.y_amplitude),
            ("x_phase", self.x_phase),
            ("y_phase", self.y_phase),
            ("angle", self.angle),
            ("offset", self.offset),
            ("exponent", self.exponent),
            ("x_offset", self.x_offset),
            ("y_offset", self.y_offset),
            ("rotation", self.rotation),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PixgraphError::validation(format!("{name} must be finite")));
        }
        if self.x_period <= 0.0 || self.y_period <= 0.0 {
            return Err(PixgraphError::validation("periods must be > 0"));
        }
        if self.x_amplitude < 0.0 || self.y_amplitude < 0.0 {
            return Err(PixgraphError::validation("amplitudes must be >= 0"));
        }
        if self.exponent < 0.0 {
            return Err(PixgraphError::validation("exponent must be >= 0"));
        }
        if !(0.0..=360.0).contains(&self.angle) || !(0.0..=360.0).contains(&self.rotation) {
            return Err(PixgraphError::validation(
                "angle and rotation must be in 0..=360 degrees",
            ));
        }
        if self.supersampling > MAX_SUPERSAMPLING {
            return Err(PixgraphError::validation(format!(
                "supersampling must be in 0..={MAX_SUPERSAMPLING}, got {}",
                self.supersampling
            )));
        }
        Ok(())
    }
}

/// Position renderer producing `(offset - ax·cos(u) - ay·cos(v))^exponent` over the infinite
/// plane, where `(u, v)` are the pixel's phases along two rotated axes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearSinusoidOp {
    params: LinearSinusoidParams,
}

impl LinearSinusoidOp {
    /// Create a generator with validated parameters.
    pub fn new(params: LinearSinusoidParams) -> PixgraphResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Current parameters.
    pub fn params(&self) -> &LinearSinusoidParams {
        &self.params
    }

    /// The pattern covers the whole plane.
    pub fn bounding_box(&self) -> Rect {
        Rect::INFINITE
    }

    /// Map from pixel coordinates at `level` to phase space `(u, v)`.
    pub fn phase_transform(&self, level: u32) -> Affine {
        let p = &self.params;
        let scale = 0.5f64.powi(level.min(i32::MAX as u32) as i32);
        let x_scale = TAU * scale / p.x_period;
        let y_scale = TAU * scale / p.y_period;
        let x_angle = -PI * p.rotation / 180.0;
        let y_angle = -PI * (p.rotation + p.angle) / 180.0;

        // Phase deltas for one pixel step along x (di) and along y (dj).
        let di = Vec2::new(x_angle.cos() * x_scale, y_angle.cos() * y_scale);
        let dj = Vec2::new(x_angle.sin() * x_scale, y_angle.sin() * y_scale);
        Affine::new([
            di.x,
            di.y,
            dj.x,
            dj.y,
            p.x_phase * scale - p.x_offset * di.x - p.y_offset * dj.x,
            p.y_phase * scale - p.x_offset * di.y - p.y_offset * dj.y,
        ])
    }

    fn value(&self, phase: Vec2) -> f64 {
        let p = &self.params;
        (p.offset - p.x_amplitude * phase.x.cos() - p.y_amplitude * phase.y.cos()).powf(p.exponent)
    }

    /// Fill `region` of `output` (a `Y' float` buffer).
    pub(crate) fn process(&self, output: &mut PixelBuffer, region: Rect, level: u32) {
        let to_phase = self.phase_transform(level);
        let [a, b, c, d, _, _] = to_phase.as_coeffs();
        let di = Vec2::new(a, b);
        let dj = Vec2::new(c, d);

        let n = 1u32 << self.params.supersampling;
        let inv = 1.0 / f64::from(n);
        let sub_di = di * inv;
        let sub_dj = dj * inv;
        // Shift the first sub-sample so the grid is centered on the pixel.
        let center = (f64::from(n) - 1.0) / (2.0 * f64::from(n));
        let weight = inv * inv;
        let half = (di + dj) * center;

        let anchor =
            |x: i32, y: i32| (to_phase * Point::new(f64::from(x), f64::from(y))).to_vec2() - half;

        let width = region.width.max(0) as usize;
        let first_block = region.x.div_euclid(ANCHOR_STRIDE) * ANCHOR_STRIDE;
        for y in region.y..region.y + region.height {
            let row = output.row_mut(region.x, y, width);
            let mut pixel = anchor(first_block, y);
            for _ in first_block..region.x {
                pixel += di;
            }
            for (x, out) in (region.x..).zip(row.iter_mut()) {
                if x.rem_euclid(ANCHOR_STRIDE) == 0 {
                    pixel = anchor(x, y);
                }
                let v = if n == 1 {
                    self.value(pixel)
                } else {
                    let mut acc = 0.0;
                    let mut sub_row = pixel;
                    for _ in 0..n {
                        let mut sub = sub_row;
                        for _ in 0..n {
                            acc += self.value(sub);
                            sub += sub_di;
                        }
                        sub_row += sub_dj;
                    }
                    acc * weight
                };
                *out = v as f32;
                pixel += di;
            }
        }
    }

    pub(crate) fn properties(&self) -> PixgraphResult<serde_json::Value> {
        property::all(&self.params)
    }

    pub(crate) fn property(&self, key: &str) -> PixgraphResult<serde_json::Value> {
        property::get(&self.params, key)
    }

    pub(crate) fn set_property(&mut self, key: &str, value: serde_json::Value) -> PixgraphResult<()> {
        property::set(&mut self.params, key, value, LinearSinusoidParams::validate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/op/linear_sinusoid.rs"]
mod tests;
