//! pixgraph is a graph-based pixel-processing engine.
//!
//! Each [`Node`] of a [`Graph`] runs one [`Operation`]. The [`Engine`] drives the node protocol:
//!
//! - [`Engine::prepare`] negotiates pad formats and bounding boxes, producers first
//! - [`Engine::process`] computes a region of a node's output, fetching the inputs it needs
//! - [`Engine::detect`] finds the node responsible for a pixel
//!
//! Outputs are deterministic: a pixel's value depends only on parameters, input pixels and its
//! absolute coordinates, so any tiling (see [`render_tiled`]) yields the same buffer.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod buffer;
pub(crate) mod color;
pub(crate) mod engine;
pub(crate) mod graph;
pub(crate) mod op;

pub use crate::foundation::core::{Affine, NodeId, Point, Rect, Vec2};
pub use crate::foundation::error::{PixgraphError, PixgraphResult};

pub use crate::buffer::export::to_rgba8;
pub use crate::buffer::pixel::{Abyss, PixelBuffer, SharedBuffer, copy_region};
pub use crate::buffer::store::{BufferStore, MemoryStore, MemoryStoreOpts, MemoryStoreStats};
pub use crate::color::format::{Format, SampleEncoding, Space};
pub use crate::color::library::{BUILTIN_SPACES, BuiltinColors, ColorLibrary, DEFAULT_SPACE};
pub use crate::engine::context::DispatchContext;
pub use crate::engine::dispatch::{Engine, EngineOpts};
pub use crate::engine::prepare::{NodeWarning, PrepareReport};
pub use crate::engine::tiles::{TileOpts, render_tiled};
pub use crate::graph::model::Graph;
pub use crate::graph::node::{Node, Pad, PadDirection};
pub use crate::op::area_filter::AreaMargins;
pub use crate::op::buffer_source::BufferSourceOp;
pub use crate::op::cast_space::{CastSpaceOp, CastSpaceParams};
pub use crate::op::linear_sinusoid::{LinearSinusoidOp, LinearSinusoidParams, MAX_SUPERSAMPLING};
pub use crate::op::shift::{MAX_SHIFT, ShiftDirection, ShiftOp, ShiftParams};
pub use crate::op::{AUX_PAD, INPUT_PAD, OUTPUT_PAD, OpClass, Operation, PadSpec};
