use crate::foundation::core::Rect;

/// Per-side halo an area filter reads around every output pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AreaMargins {
    /// Extra columns read to the left.
    pub left: i32,
    /// Extra columns read to the right.
    pub right: i32,
    /// Extra rows read above.
    pub top: i32,
    /// Extra rows read below.
    pub bottom: i32,
}

impl AreaMargins {
    /// Same margin on every side.
    pub fn uniform(m: i32) -> Self {
        Self {
            left: m,
            right: m,
            top: m,
            bottom: m,
        }
    }

    /// Input rect needed to compute `region`.
    pub fn expand(self, region: Rect) -> Rect {
        region.expand(self.left, self.right, self.top, self.bottom)
    }
}

/// A filter's output covers exactly its input. An unconnected filter covers nothing.
pub(crate) fn bounding_box(input: Option<Rect>) -> Rect {
    input.unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/op/area_filter.rs"]
mod tests;
