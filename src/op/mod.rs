//! Operation kinds and their per-class protocol helpers.

pub(crate) mod area_filter;
pub(crate) mod buffer_source;
pub(crate) mod cast_space;
pub(crate) mod composer;
pub(crate) mod linear_sinusoid;
pub(crate) mod property;
pub(crate) mod shift;

use serde_json::Value;

use crate::foundation::error::{PixgraphError, PixgraphResult};

use self::buffer_source::BufferSourceOp;
use self::cast_space::CastSpaceOp;
use self::linear_sinusoid::LinearSinusoidOp;
use self::shift::ShiftOp;

/// Name of the single output pad every node has.
pub const OUTPUT_PAD: &str = "output";
/// Name of the primary input pad.
pub const INPUT_PAD: &str = "input";
/// Name of a composer's secondary input pad.
pub const AUX_PAD: &str = "aux";

/// Declaration of an input pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadSpec {
    /// Pad name, unique within the node.
    pub name: &'static str,
    /// Whether the pad must be connected for the node to produce output.
    pub required: bool,
}

const AREA_FILTER_PADS: &[PadSpec] = &[PadSpec {
    name: INPUT_PAD,
    required: true,
}];

const COMPOSER_PADS: &[PadSpec] = &[
    PadSpec {
        name: INPUT_PAD,
        required: false,
    },
    PadSpec {
        name: AUX_PAD,
        required: false,
    },
];

/// Protocol family of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpClass {
    /// One input, output pixels depend on a neighbourhood of input pixels.
    AreaFilter,
    /// Several optional inputs merged into one output.
    Composer,
    /// No inputs, output is a function of pixel position.
    PositionRenderer,
    /// No inputs, output comes from an external buffer.
    Source,
}

impl OpClass {
    /// Input pads declared by every operation of this class, in draw order.
    pub fn input_pads(self) -> &'static [PadSpec] {
        match self {
            Self::AreaFilter => AREA_FILTER_PADS,
            Self::Composer => COMPOSER_PADS,
            Self::PositionRenderer | Self::Source => &[],
        }
    }

    /// Whether dispatch must fail when every source is absent.
    pub fn mandates_input(self) -> bool {
        matches!(self, Self::AreaFilter | Self::Composer)
    }
}

/// Closed set of operation kinds a node can run.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Random row/column displacement.
    Shift(ShiftOp),
    /// Color-space relabel.
    CastSpace(CastSpaceOp),
    /// Periodic sinusoid pattern.
    LinearSinusoid(LinearSinusoidOp),
    /// Externally supplied pixels.
    BufferSource(BufferSourceOp),
}

impl Operation {
    /// Operation name, e.g. `"shift"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shift(_) => "shift",
            Self::CastSpace(_) => "cast-space",
            Self::LinearSinusoid(_) => "linear-sinusoid",
            Self::BufferSource(_) => "buffer-source",
        }
    }

    /// Protocol family.
    pub fn class(&self) -> OpClass {
        match self {
            Self::Shift(_) => OpClass::AreaFilter,
            Self::CastSpace(_) => OpClass::Composer,
            Self::LinearSinusoid(_) => OpClass::PositionRenderer,
            Self::BufferSource(_) => OpClass::Source,
        }
    }

    /// Declared input pads.
    pub fn input_pads(&self) -> &'static [PadSpec] {
        self.class().input_pads()
    }

    /// Return `true` when `pad` is a declared input pad.
    pub fn has_input_pad(&self, pad: &str) -> bool {
        self.input_pads().iter().any(|p| p.name == pad)
    }

    /// Whether the output may reuse the primary input buffer.
    pub fn permits_in_place(&self) -> bool {
        matches!(self, Self::CastSpace(_))
    }

    /// All parameters as a JSON object.
    pub fn properties(&self) -> PixgraphResult<Value> {
        match self {
            Self::Shift(op) => op.properties(),
            Self::CastSpace(op) => op.properties(),
            Self::LinearSinusoid(op) => op.properties(),
            Self::BufferSource(_) => Ok(Value::Object(serde_json::Map::new())),
        }
    }

    /// Read one parameter.
    pub fn property(&self, key: &str) -> PixgraphResult<Value> {
        match self {
            Self::Shift(op) => op.property(key),
            Self::CastSpace(op) => op.property(key),
            Self::LinearSinusoid(op) => op.property(key),
            Self::BufferSource(_) => Err(no_properties("buffer-source", key)),
        }
    }

    /// Replace one parameter. Invalid values leave the operation unchanged.
    pub fn set_property(&mut self, key: &str, value: Value) -> PixgraphResult<()> {
        match self {
            Self::Shift(op) => op.set_property(key, value),
            Self::CastSpace(op) => op.set_property(key, value),
            Self::LinearSinusoid(op) => op.set_property(key, value),
            Self::BufferSource(_) => Err(no_properties("buffer-source", key)),
        }
    }
}

fn no_properties(name: &str, key: &str) -> PixgraphError {
    PixgraphError::validation(format!("unknown property {key:?}: {name} has no properties"))
}

impl From<ShiftOp> for Operation {
    fn from(op: ShiftOp) -> Self {
        Self::Shift(op)
    }
}

impl From<CastSpaceOp> for Operation {
    fn from(op: CastSpaceOp) -> Self {
        Self::CastSpace(op)
    }
}

impl From<LinearSinusoidOp> for Operation {
    fn from(op: LinearSinusoidOp) -> Self {
        Self::LinearSinusoid(op)
    }
}

impl From<BufferSourceOp> for Operation {
    fn from(op: BufferSourceOp) -> Self {
        Self::BufferSource(op)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/op/operation.rs"]
mod tests;
