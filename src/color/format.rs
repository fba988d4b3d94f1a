use std::fmt;
use std::sync::Arc;

/// Sample layout of a pixel buffer. All encodings store `f32` samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleEncoding {
    /// Single gamma-encoded luma channel (`Y' float`).
    YFloat,
    /// Gamma-encoded RGB plus linear alpha (`R'G'B'A float`).
    RgbaFloat,
}

impl SampleEncoding {
    /// Number of samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::YFloat => 1,
            Self::RgbaFloat => 4,
        }
    }

    /// Canonical encoding name.
    pub fn name(self) -> &'static str {
        match self {
            Self::YFloat => "Y' float",
            Self::RgbaFloat => "R'G'B'A float",
        }
    }

    /// Parse a canonical encoding name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Y' float" => Some(Self::YFloat),
            "R'G'B'A float" => Some(Self::RgbaFloat),
            _ => None,
        }
    }
}

/// Opaque color space tag. Equality is by name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Space(Arc<str>);

impl Space {
    /// Create a space tag from its name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Space name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Space({})", self.0)
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pixel format: sample encoding plus an optional space tag.
///
/// An untagged format is the degraded result of an unresolved space.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Format {
    /// Sample layout.
    pub encoding: SampleEncoding,
    /// Color space tag, `None` when unresolved.
    pub space: Option<Space>,
}

impl Format {
    /// Create a format tagged with `space`.
    pub fn new(encoding: SampleEncoding, space: Option<Space>) -> Self {
        Self { encoding, space }
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        self.encoding.channels()
    }

    /// Return `true` when buffers of both formats share a sample layout.
    pub fn same_layout(&self, other: &Format) -> bool {
        self.encoding == other.encoding
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.space {
            Some(space) => write!(f, "{} ({})", self.encoding.name(), space),
            None => write!(f, "{} (untagged)", self.encoding.name()),
        }
    }
}
