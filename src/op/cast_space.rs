use serde::{Deserialize, Serialize};

use crate::buffer::pixel::{Abyss, PixelBuffer, copy_region};
use crate::color::format::{Format, SampleEncoding, Space};
use crate::color::library::{ColorLibrary, DEFAULT_SPACE};
use crate::foundation::core::Rect;
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::op::property;

/// Parameters of the cast-space composer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CastSpaceParams {
    /// Named target space, used when neither a profile nor an aux input supplies one.
    pub space: String,
    /// Raw ICC profile bytes. Takes precedence over every other source of the target space.
    pub icc_profile: Option<Vec<u8>>,
}

impl Default for CastSpaceParams {
    fn default() -> Self {
        Self {
            space: DEFAULT_SPACE.to_string(),
            icc_profile: None,
        }
    }
}

impl CastSpaceParams {
    /// Check values.
    pub fn validate(&self) -> PixgraphResult<()> {
        if self.space.trim().is_empty() {
            return Err(PixgraphError::validation("space name must not be empty"));
        }
        if self.icc_profile.as_ref().is_some_and(Vec::is_empty) {
            return Err(PixgraphError::validation(
                "icc_profile must not be empty; unset it instead",
            ));
        }
        Ok(())
    }
}

/// Formats negotiated by [`CastSpaceOp::negotiate`].
#[derive(Debug)]
pub(crate) struct CastFormats {
    pub(crate) input: Format,
    pub(crate) aux: Format,
    pub(crate) output: Format,
    /// Non-fatal resolution failures, in the order they were hit.
    pub(crate) warnings: Vec<PixgraphError>,
}

/// Composer that re-tags its input with another color space without touching sample values.
///
/// The target space comes from, in order: the loaded ICC profile, the aux input's space, the
/// named `space` parameter. When none resolves the output is left untagged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastSpaceOp {
    params: CastSpaceParams,
}

impl CastSpaceOp {
    /// Create a cast with validated parameters.
    pub fn new(params: CastSpaceParams) -> PixgraphResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Current parameters.
    pub fn params(&self) -> &CastSpaceParams {
        &self.params
    }

    /// Negotiate pad formats from the upstream output formats.
    ///
    /// The input keeps its upstream space so no conversion happens on the way in; the output
    /// shares the input's layout and carries the target space.
    pub(crate) fn negotiate(
        &self,
        colors: &dyn ColorLibrary,
        input: Option<&Format>,
        aux: Option<&Format>,
    ) -> CastFormats {
        let mut warnings = Vec::new();
        let canonical = colors
            .resolve(SampleEncoding::RgbaFloat.name())
            .unwrap_or(Format::new(SampleEncoding::RgbaFloat, None));
        let input_space = input.and_then(|f| f.space.as_ref());
        let input_format = colors.with_space(&canonical, input_space);

        let target = self.target_space(colors, aux, &mut warnings);
        let output = colors.with_space(&canonical, target.as_ref());
        let aux_format = match aux {
            Some(f) => f.clone(),
            None => canonical,
        };
        CastFormats {
            input: input_format,
            aux: aux_format,
            output,
            warnings,
        }
    }

    fn target_space(
        &self,
        colors: &dyn ColorLibrary,
        aux: Option<&Format>,
        warnings: &mut Vec<PixgraphError>,
    ) -> Option<Space> {
        if let Some(bytes) = &self.params.icc_profile {
            match colors.load_space_from_profile_bytes(bytes) {
                Ok(space) => return Some(space),
                Err(e) => warnings.push(PixgraphError::unresolved(format!(
                    "icc profile ignored: {e}"
                ))),
            }
        }
        if let Some(space) = aux.and_then(|f| f.space.clone()) {
            return Some(space);
        }
        let named = colors.space(&self.params.space);
        if named.is_none() {
            warnings.push(PixgraphError::unresolved(format!(
                "unknown color space {:?}, output left untagged",
                self.params.space
            )));
        }
        named
    }

    /// Copy `region` of `input` into `output` unchanged.
    pub(crate) fn process(
        &self,
        input: &PixelBuffer,
        output: &mut PixelBuffer,
        region: Rect,
    ) -> PixgraphResult<()> {
        copy_region(input, region, output, region, Abyss::None)
    }

    pub(crate) fn properties(&self) -> PixgraphResult<serde_json::Value> {
        property::all(&self.params)
    }

    pub(crate) fn property(&self, key: &str) -> PixgraphResult<serde_json::Value> {
        property::get(&self.params, key)
    }

    pub(crate) fn set_property(&mut self, key: &str, value: serde_json::Value) -> PixgraphResult<()> {
        property::set(&mut self.params, key, value, CastSpaceParams::validate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/op/cast_space.rs"]
mod tests;
