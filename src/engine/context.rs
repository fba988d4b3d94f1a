use smallvec::SmallVec;

use crate::buffer::pixel::{PixelBuffer, SharedBuffer};
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::op::OUTPUT_PAD;

/// Per-dispatch scratch: fetched source buffers by input pad, plus the output slot.
///
/// Sources are dropped when the dispatch finishes. An entry may be present with no buffer, which
/// records that the pad was fetched and came back empty.
#[derive(Debug, Default)]
pub struct DispatchContext {
    sources: SmallVec<[(String, Option<SharedBuffer>); 2]>,
    output: Option<SharedBuffer>,
}

impl DispatchContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`DispatchContext::set_source`].
    pub fn with_source(mut self, pad: &str, buffer: SharedBuffer) -> Self {
        self.set_source(pad, Some(buffer));
        self
    }

    /// Record the source of input pad `pad`, replacing any earlier entry.
    pub fn set_source(&mut self, pad: &str, buffer: Option<SharedBuffer>) {
        match self.sources.iter_mut().find(|(name, _)| name == pad) {
            Some(entry) => entry.1 = buffer,
            None => self.sources.push((pad.to_string(), buffer)),
        }
    }

    /// Return `true` when pad `pad` has an entry, even an empty one.
    pub fn has_source(&self, pad: &str) -> bool {
        self.sources.iter().any(|(name, _)| name == pad)
    }

    pub(crate) fn source_pads(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }

    /// Source buffer of pad `pad`.
    pub fn source(&self, pad: &str) -> Option<&PixelBuffer> {
        self.sources
            .iter()
            .find(|(name, _)| name == pad)
            .and_then(|(_, b)| b.as_deref())
    }

    /// Move the source buffer of pad `pad` out, leaving an empty entry.
    pub fn take_source(&mut self, pad: &str) -> Option<SharedBuffer> {
        self.sources
            .iter_mut()
            .find(|(name, _)| name == pad)
            .and_then(|(_, b)| b.take())
    }

    /// Drop every source.
    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    /// Output registered under `pad`. Only `output` exists.
    pub fn output(&self, pad: &str) -> PixgraphResult<Option<&SharedBuffer>> {
        if pad != OUTPUT_PAD {
            return Err(PixgraphError::contract(format!("no output pad named {pad:?}")));
        }
        Ok(self.output.as_ref())
    }

    /// Move the output out of the context.
    pub fn take_output(&mut self) -> Option<SharedBuffer> {
        self.output.take()
    }

    pub(crate) fn set_output(&mut self, buffer: SharedBuffer) {
        self.output = Some(buffer);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/context.rs"]
mod tests;
