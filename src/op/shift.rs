use serde::{Deserialize, Serialize};

use crate::buffer::pixel::{Abyss, PixelBuffer, copy_region};
use crate::foundation::core::Rect;
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::foundation::math::CoordRandom;
use crate::op::area_filter::AreaMargins;
use crate::op::property;

/// Largest accepted `shift` value.
pub const MAX_SHIFT: i32 = 200;

/// Axis along which whole rows or columns are displaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    /// Every row is moved left or right.
    #[default]
    Horizontal,
    /// Every column is moved up or down.
    Vertical,
}

/// Parameters of the shift filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShiftParams {
    /// Maximum displacement in pixels, `0..=200`.
    pub shift: i32,
    /// Displacement axis.
    pub direction: ShiftDirection,
    /// Random seed.
    pub seed: u32,
}

impl Default for ShiftParams {
    fn default() -> Self {
        Self {
            shift: 5,
            direction: ShiftDirection::Horizontal,
            seed: 0,
        }
    }
}

impl ShiftParams {
    /// Check ranges.
    pub fn validate(&self) -> PixgraphResult<()> {
        if !(0..=MAX_SHIFT).contains(&self.shift) {
            return Err(PixgraphError::validation(format!(
                "shift must be in 0..={MAX_SHIFT}, got {}",
                self.shift
            )));
        }
        Ok(())
    }
}

/// Area filter that displaces each row (or column) by a seeded pseudo-random offset in
/// `[-shift, shift]`. Reads past the input edge repeat the edge pixel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShiftOp {
    params: ShiftParams,
}

impl ShiftOp {
    /// Create a shift filter with validated parameters.
    pub fn new(params: ShiftParams) -> PixgraphResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Current parameters.
    pub fn params(&self) -> &ShiftParams {
        &self.params
    }

    /// Halo read around the output: `shift` pixels on both sides of the displacement axis.
    pub fn margins(&self) -> AreaMargins {
        let s = self.params.shift;
        match self.params.direction {
            ShiftDirection::Horizontal => AreaMargins {
                left: s,
                right: s,
                top: 0,
                bottom: 0,
            },
            ShiftDirection::Vertical => AreaMargins {
                left: 0,
                right: 0,
                top: s,
                bottom: s,
            },
        }
    }

    /// Displacement of the row (horizontal) or column (vertical) at absolute position `pos`.
    pub fn displacement(&self, pos: i32) -> i32 {
        let s = self.params.shift;
        CoordRandom::new(self.params.seed).int_range(pos, 0, 0, 0, -s, s + 1)
    }

    /// Fill `region` of `output` from `input`. Reads outside `input` repeat its edge pixels, so
    /// `input` only needs to cover `margins().expand(region)` clamped into the upstream extent.
    pub(crate) fn process(
        &self,
        input: &PixelBuffer,
        output: &mut PixelBuffer,
        region: Rect,
    ) -> PixgraphResult<()> {
        match self.params.direction {
            ShiftDirection::Horizontal => {
                for y in region.y..region.y + region.height {
                    let d = self.displacement(y);
                    let dst = Rect::new(region.x, y, region.width, 1);
                    let src = Rect::new(region.x + d, y, region.width, 1);
                    copy_region(input, src, output, dst, Abyss::Clamp)?;
                }
            }
            ShiftDirection::Vertical => {
                for x in region.x..region.x + region.width {
                    let d = self.displacement(x);
                    let dst = Rect::new(x, region.y, 1, region.height);
                    let src = Rect::new(x, region.y + d, 1, region.height);
                    copy_region(input, src, output, dst, Abyss::Clamp)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn properties(&self) -> PixgraphResult<serde_json::Value> {
        property::all(&self.params)
    }

    pub(crate) fn property(&self, key: &str) -> PixgraphResult<serde_json::Value> {
        property::get(&self.params, key)
    }

    pub(crate) fn set_property(&mut self, key: &str, value: serde_json::Value) -> PixgraphResult<()> {
        property::set(&mut self.params, key, value, ShiftParams::validate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/op/shift.rs"]
mod tests;
