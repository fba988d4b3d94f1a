use std::sync::Arc;

use crate::buffer::pixel::{Abyss, PixelBuffer, SharedBuffer, copy_region};
use crate::buffer::store::BufferStore;
use crate::color::format::Format;
use crate::foundation::core::Rect;
use crate::foundation::error::PixgraphResult;

/// Leaf node that serves an externally supplied buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferSourceOp {
    buffer: SharedBuffer,
}

impl BufferSourceOp {
    /// Serve `buffer`.
    pub fn new(buffer: PixelBuffer) -> Self {
        Self::from_shared(Arc::new(buffer))
    }

    /// Serve an already shared buffer.
    pub fn from_shared(buffer: SharedBuffer) -> Self {
        Self { buffer }
    }

    /// The served buffer.
    pub fn buffer(&self) -> &SharedBuffer {
        &self.buffer
    }

    /// Output format.
    pub fn format(&self) -> &Format {
        self.buffer.format()
    }

    /// Extent of the served buffer.
    pub fn bounding_box(&self) -> Rect {
        self.buffer.extent()
    }

    /// The whole buffer when `region` matches its extent, otherwise a fresh copy of `region`
    /// reading zero outside the extent.
    pub(crate) fn process(
        &self,
        store: &dyn BufferStore,
        region: Rect,
    ) -> PixgraphResult<SharedBuffer> {
        if region == self.buffer.extent() {
            return Ok(SharedBuffer::clone(&self.buffer));
        }
        let mut out = store.allocate(region, self.buffer.format())?;
        copy_region(&self.buffer, region, &mut out, region, Abyss::None)?;
        Ok(Arc::new(out))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/op/buffer_source.rs"]
mod tests;
