use std::sync::Arc;

use smallvec::SmallVec;

use crate::buffer::pixel::SharedBuffer;
use crate::buffer::store::{BufferStore, MemoryStore};
use crate::color::format::Format;
use crate::color::library::{BuiltinColors, ColorLibrary};
use crate::engine::context::DispatchContext;
use crate::foundation::core::{NodeId, Rect};
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::graph::model::Graph;
use crate::graph::node::{Node, Pad};
use crate::op::{INPUT_PAD, OUTPUT_PAD, OpClass, Operation, composer};

/// Dispatch switches.
#[derive(Debug, Clone, Copy)]
pub struct EngineOpts {
    /// Let operations that permit it reuse a uniquely owned input buffer as their output.
    pub in_place: bool,
    /// Offer finished outputs to the store for retention, and consult it before computing.
    pub retain_outputs: bool,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            in_place: true,
            retain_outputs: true,
        }
    }
}

/// Runs the node protocol over a [`Graph`].
///
/// The engine holds no per-graph state; everything a dispatch needs is either fixed on the graph
/// by [`Engine::prepare`] or passed in.
pub struct Engine {
    store: Arc<dyn BufferStore>,
    colors: Arc<dyn ColorLibrary>,
    opts: EngineOpts,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryStore::default()),
            Arc::new(BuiltinColors),
            EngineOpts::default(),
        )
    }
}

impl Engine {
    /// Create an engine over the given store and color library.
    pub fn new(
        store: Arc<dyn BufferStore>,
        colors: Arc<dyn ColorLibrary>,
        opts: EngineOpts,
    ) -> Self {
        Self {
            store,
            colors,
            opts,
        }
    }

    /// Buffer store used for allocation and retention.
    pub fn store(&self) -> &dyn BufferStore {
        self.store.as_ref()
    }

    /// Color library used during prepare.
    pub fn colors(&self) -> &dyn ColorLibrary {
        self.colors.as_ref()
    }

    /// Dispatch switches.
    pub fn opts(&self) -> EngineOpts {
        self.opts
    }

    /// Spatial extent of `node`'s output.
    pub fn bounding_box(&self, graph: &Graph, node: NodeId) -> PixgraphResult<Rect> {
        check_prepared(graph)?;
        Ok(graph.node(node)?.bounding_box())
    }

    /// Rect of input pad `input_pad` needed to compute `region` of `node`'s output.
    pub fn required_for_output(
        &self,
        graph: &Graph,
        node: NodeId,
        input_pad: &str,
        region: Rect,
    ) -> PixgraphResult<Rect> {
        required_for(graph.node(node)?, input_pad, region)
    }

    /// Node responsible for the pixel at `(x, y)` of `node`'s output, if any.
    #[tracing::instrument(level = "trace", skip(self, graph))]
    pub fn detect(
        &self,
        graph: &Graph,
        node: NodeId,
        x: i32,
        y: i32,
    ) -> PixgraphResult<Option<NodeId>> {
        check_prepared(graph)?;
        let n = graph.node(node)?;
        match n.op().class() {
            OpClass::AreaFilter => match n.producer(INPUT_PAD) {
                Some(p) => self.detect(graph, p, x, y),
                None => Ok(None),
            },
            OpClass::Composer => {
                let mut hits = SmallVec::<[Option<NodeId>; 2]>::new();
                for pad in n.input_pads() {
                    hits.push(match pad.producer() {
                        Some(p) => self.detect(graph, p, x, y)?,
                        None => None,
                    });
                }
                Ok(composer::prefer_topmost(&hits))
            }
            OpClass::PositionRenderer | OpClass::Source => {
                Ok(n.bounding_box().contains_point(x, y).then_some(node))
            }
        }
    }

    /// Compute `region` of `node`'s output, fetching every input from upstream.
    ///
    /// The returned buffer covers at least `region`; a buffer served from the store or reused in
    /// place may be larger. Returns `Ok(None)` for a zero-area region.
    pub fn process(
        &self,
        graph: &Graph,
        node: NodeId,
        output_pad: &str,
        region: Rect,
        level: u32,
    ) -> PixgraphResult<Option<SharedBuffer>> {
        let mut ctx = DispatchContext::new();
        self.process_into(graph, node, output_pad, region, level, &mut ctx)?;
        Ok(ctx.take_output())
    }

    /// Like [`Engine::process`], registering the result in `ctx`. Sources already present in
    /// `ctx` are used as given instead of being fetched. Any output left in `ctx` by an earlier
    /// call is dropped first, so a failed or zero-area call leaves no output behind.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(node = node.0, x = region.x, y = region.y, w = region.width, h = region.height)
    )]
    pub fn process_into(
        &self,
        graph: &Graph,
        node: NodeId,
        output_pad: &str,
        region: Rect,
        level: u32,
        ctx: &mut DispatchContext,
    ) -> PixgraphResult<()> {
        ctx.take_output();
        check_output_pad(output_pad)?;
        if region.is_empty() {
            ctx.clear_sources();
            return Ok(());
        }
        check_prepared(graph)?;
        if self.opts.retain_outputs
            && let Some(hit) = self.store.get(node, level, region)
        {
            tracing::trace!(node = node.0, "served from store");
            ctx.clear_sources();
            ctx.set_output(hit);
            return Ok(());
        }
        let n = graph.node(node)?;
        for pad in n.input_pads() {
            if ctx.has_source(pad.name()) {
                continue;
            }
            let source = self.fetch(graph, n, pad, region, level)?;
            ctx.set_source(pad.name(), source);
        }
        self.dispatch(graph, node, output_pad, region, level, ctx)
    }

    /// Run `node`'s compute over `region` with the sources in `ctx`, registering the result as
    /// `ctx`'s output. Sources are consumed and any earlier output is dropped.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(node = node.0, x = region.x, y = region.y, w = region.width, h = region.height)
    )]
    pub fn dispatch(
        &self,
        graph: &Graph,
        node: NodeId,
        output_pad: &str,
        region: Rect,
        level: u32,
        ctx: &mut DispatchContext,
    ) -> PixgraphResult<()> {
        ctx.take_output();
        check_output_pad(output_pad)?;
        if region.is_empty() {
            ctx.clear_sources();
            return Ok(());
        }
        check_prepared(graph)?;
        let n = graph.node(node)?;
        let op = n.op();
        let undeclared = ctx
            .source_pads()
            .find(|p| !op.has_input_pad(p))
            .map(str::to_string);
        if let Some(pad) = undeclared {
            let msg = format!("{} node {} has no input pad {pad:?}", op.name(), node.0);
            tracing::error!("{msg}");
            ctx.clear_sources();
            return Err(PixgraphError::contract(msg));
        }
        let out_format = n
            .output_format()
            .cloned()
            .ok_or_else(|| PixgraphError::contract(format!("node {} is not prepared", node.0)))?;

        if op.class().mandates_input() && n.input_pads().all(|p| ctx.source(p.name()).is_none()) {
            ctx.clear_sources();
            return Err(PixgraphError::missing_input(format!(
                "{} node {} received no source on any input",
                op.name(),
                node.0
            )));
        }

        let reused = if self.opts.in_place && op.permits_in_place() {
            match ctx.take_source(INPUT_PAD) {
                Some(buf) => match reuse_in_place(buf, region, &out_format) {
                    Ok(buf) => Some(buf),
                    Err(buf) => {
                        ctx.set_source(INPUT_PAD, Some(buf));
                        None
                    }
                },
                None => None,
            }
        } else {
            None
        };

        let result = self.compute(n, ctx, reused, region, level, &out_format);
        ctx.clear_sources();
        let output = result?;

        if self.opts.retain_outputs {
            self.store.put(node, level, &output);
        }
        ctx.set_output(output);
        Ok(())
    }

    fn compute(
        &self,
        node: &Node,
        ctx: &DispatchContext,
        reused: Option<SharedBuffer>,
        region: Rect,
        level: u32,
        out_format: &Format,
    ) -> PixgraphResult<SharedBuffer> {
        match node.op() {
            Operation::Shift(op) => {
                let input = ctx.source(INPUT_PAD).ok_or_else(|| no_input(node))?;
                let mut out = self.store.allocate(region, out_format)?;
                op.process(input, &mut out, region)?;
                Ok(Arc::new(out))
            }
            Operation::CastSpace(op) => {
                if let Some(buf) = reused {
                    tracing::trace!(node = node.id().0, "cast-space in place");
                    return Ok(buf);
                }
                let input = ctx.source(INPUT_PAD).ok_or_else(|| no_input(node))?;
                let mut out = self.store.allocate(region, out_format)?;
                op.process(input, &mut out, region)?;
                Ok(Arc::new(out))
            }
            Operation::LinearSinusoid(op) => {
                let mut out = self.store.allocate(region, out_format)?;
                op.process(&mut out, region, level);
                Ok(Arc::new(out))
            }
            Operation::BufferSource(op) => op.process(self.store.as_ref(), region),
        }
    }

    fn fetch(
        &self,
        graph: &Graph,
        node: &Node,
        pad: &Pad,
        region: Rect,
        level: u32,
    ) -> PixgraphResult<Option<SharedBuffer>> {
        let Some(producer) = pad.producer() else {
            return Ok(None);
        };
        let required = required_for(node, pad.name(), region)?;
        let bounds = graph.node(producer)?.bounding_box();
        let Some(request) = required.clamp_into(bounds) else {
            return Ok(None);
        };
        let Some(buf) = self.process(graph, producer, OUTPUT_PAD, request, level)? else {
            return Ok(None);
        };
        match pad.format() {
            Some(want) if want.encoding != buf.format().encoding => {
                Ok(Some(Arc::new(buf.converted(want.encoding))))
            }
            _ => Ok(Some(buf)),
        }
    }
}

fn required_for(node: &Node, input_pad: &str, region: Rect) -> PixgraphResult<Rect> {
    let op = node.op();
    if !op.has_input_pad(input_pad) {
        return Err(PixgraphError::contract(format!(
            "{} node {} has no input pad {input_pad:?}",
            op.name(),
            node.id().0
        )));
    }
    Ok(match op {
        Operation::Shift(shift) => shift.margins().expand(region),
        Operation::CastSpace(_) => region,
        // No input pads, rejected above.
        Operation::LinearSinusoid(_) | Operation::BufferSource(_) => region,
    })
}

/// Take `buf` as the output when it is uniquely owned, has the output's layout and covers
/// `region`. Hands the buffer back otherwise.
fn reuse_in_place(
    mut buf: SharedBuffer,
    region: Rect,
    format: &Format,
) -> Result<SharedBuffer, SharedBuffer> {
    if !buf.format().same_layout(format) || !buf.extent().contains(region) {
        return Err(buf);
    }
    let retagged = match Arc::get_mut(&mut buf) {
        Some(inner) => inner.set_format(format.clone()).is_ok(),
        None => false,
    };
    if retagged { Ok(buf) } else { Err(buf) }
}

fn check_output_pad(pad: &str) -> PixgraphResult<()> {
    if pad == OUTPUT_PAD {
        return Ok(());
    }
    tracing::error!(pad, "dispatch requested an unknown output pad");
    Err(PixgraphError::contract(format!("no output pad named {pad:?}")))
}

fn check_prepared(graph: &Graph) -> PixgraphResult<()> {
    if graph.needs_prepare() {
        return Err(PixgraphError::contract(
            "graph was edited since the last prepare",
        ));
    }
    Ok(())
}

fn no_input(node: &Node) -> PixgraphError {
    PixgraphError::missing_input(format!(
        "{} node {} received no source on {INPUT_PAD:?}",
        node.op().name(),
        node.id().0
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/dispatch.rs"]
mod tests;
