use crate::color::format::{Format, SampleEncoding, Space};
use crate::color::icc::parse_profile;
use crate::foundation::error::PixgraphResult;

/// Boundary to the color-management library that supplies format and space value objects.
///
/// Implementations must be cheap to call from `prepare()` and safe to share across threads.
pub trait ColorLibrary: Send + Sync {
    /// Resolve a format by name, e.g. `"R'G'B'A float"`. The result is tagged with the
    /// library's default space.
    fn resolve(&self, name: &str) -> Option<Format>;

    /// Look up a named color space.
    fn space(&self, name: &str) -> Option<Space>;

    /// Re-tag `format` with `space`, keeping its sample layout.
    fn with_space(&self, format: &Format, space: Option<&Space>) -> Format {
        Format::new(format.encoding, space.cloned())
    }

    /// Build a space from the bytes of an ICC matrix profile.
    fn load_space_from_profile_bytes(&self, bytes: &[u8]) -> PixgraphResult<Space>;
}

/// Spaces known to [`BuiltinColors`]. Lookups are case-insensitive.
pub const BUILTIN_SPACES: &[&str] = &["sRGB", "Rec2020", "ACEScg", "Adobish", "ProPhoto"];

/// Name of the default space.
pub const DEFAULT_SPACE: &str = "sRGB";

/// Small in-process [`ColorLibrary`] with a fixed list of named spaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinColors;

impl ColorLibrary for BuiltinColors {
    fn resolve(&self, name: &str) -> Option<Format> {
        let encoding = SampleEncoding::from_name(name)?;
        Some(Format::new(encoding, self.space(DEFAULT_SPACE)))
    }

    fn space(&self, name: &str) -> Option<Space> {
        BUILTIN_SPACES
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .map(Space::new)
    }

    fn load_space_from_profile_bytes(&self, bytes: &[u8]) -> PixgraphResult<Space> {
        let summary = parse_profile(bytes)?;
        let name = match summary.description {
            Some(desc) => format!("icc:{desc}"),
            None => format!(
                "icc:{:016x}",
                xxhash_rust::xxh3::xxh3_64_with_seed(bytes, 0)
            ),
        };
        Ok(Space::new(name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/library.rs"]
mod tests;
