use smallvec::SmallVec;

use crate::color::format::Format;
use crate::foundation::core::{NodeId, Rect};
use crate::op::{OUTPUT_PAD, Operation};

/// Direction of a pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadDirection {
    /// Receives pixels from a producer.
    Input,
    /// Hands pixels to consumers.
    Output,
}

/// Named connection point of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Pad {
    name: &'static str,
    direction: PadDirection,
    required: bool,
    format: Option<Format>,
    producer: Option<NodeId>,
}

impl Pad {
    fn new(name: &'static str, direction: PadDirection, required: bool) -> Self {
        Self {
            name,
            direction,
            required,
            format: None,
            producer: None,
        }
    }

    /// Pad name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Pad direction.
    pub fn direction(&self) -> PadDirection {
        self.direction
    }

    /// Whether the pad must be connected.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Format bound by the last prepare, if any.
    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    /// Upstream node feeding this input pad.
    pub fn producer(&self) -> Option<NodeId> {
        self.producer
    }
}

/// Graph vertex: one operation plus its pads.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    op: Operation,
    pads: SmallVec<[Pad; 3]>,
    bounding_box: Rect,
}

impl Node {
    pub(crate) fn new(id: NodeId, op: Operation) -> Self {
        let mut pads: SmallVec<[Pad; 3]> = op
            .input_pads()
            .iter()
            .map(|spec| Pad::new(spec.name, PadDirection::Input, spec.required))
            .collect();
        pads.push(Pad::new(OUTPUT_PAD, PadDirection::Output, false));
        Self {
            id,
            op,
            pads,
            bounding_box: Rect::default(),
        }
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Operation run by this node.
    pub fn op(&self) -> &Operation {
        &self.op
    }

    pub(crate) fn op_mut(&mut self) -> &mut Operation {
        &mut self.op
    }

    /// All pads, inputs first in declaration order, then `output`.
    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Pad by name.
    pub fn pad(&self, name: &str) -> Option<&Pad> {
        self.pads.iter().find(|p| p.name == name)
    }

    pub(crate) fn pad_mut(&mut self, name: &str) -> Option<&mut Pad> {
        self.pads.iter_mut().find(|p| p.name == name)
    }

    /// Input pads in declaration order.
    pub fn input_pads(&self) -> impl Iterator<Item = &Pad> {
        self.pads
            .iter()
            .filter(|p| p.direction == PadDirection::Input)
    }

    /// Producer connected to input pad `name`.
    pub fn producer(&self, name: &str) -> Option<NodeId> {
        self.pad(name).and_then(Pad::producer)
    }

    /// Output format bound by the last prepare.
    pub fn output_format(&self) -> Option<&Format> {
        self.pad(OUTPUT_PAD).and_then(Pad::format)
    }

    /// Bounding box computed by the last prepare.
    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub(crate) fn set_producer(&mut self, pad: &str, producer: Option<NodeId>) -> Option<NodeId> {
        match self.pad_mut(pad) {
            Some(p) => std::mem::replace(&mut p.producer, producer),
            None => None,
        }
    }

    pub(crate) fn bind_format(&mut self, pad: &str, format: Format) {
        if let Some(p) = self.pad_mut(pad) {
            p.format = Some(format);
        }
    }

    pub(crate) fn set_bounding_box(&mut self, bbox: Rect) {
        self.bounding_box = bbox;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/node.rs"]
mod tests;
