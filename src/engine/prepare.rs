use smallvec::SmallVec;

use crate::color::format::{Format, SampleEncoding};
use crate::color::library::DEFAULT_SPACE;
use crate::engine::dispatch::Engine;
use crate::foundation::core::{NodeId, Rect};
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::graph::model::Graph;
use crate::op::{AUX_PAD, INPUT_PAD, OUTPUT_PAD, Operation, area_filter, composer};

/// Non-fatal diagnostic raised while preparing one node.
#[derive(Debug)]
pub struct NodeWarning {
    /// Node that raised it.
    pub node: NodeId,
    /// What went wrong.
    pub error: PixgraphError,
}

/// Outcome of [`Engine::prepare`].
#[derive(Debug, Default)]
pub struct PrepareReport {
    /// Nodes prepared, producers first.
    pub order: Vec<NodeId>,
    /// Nodes whose retained outputs were invalidated.
    pub invalidated: Vec<NodeId>,
    /// Non-fatal diagnostics.
    pub warnings: Vec<NodeWarning>,
}

/// Upstream output seen by one input pad.
#[derive(Clone, Debug)]
struct Upstream {
    format: Format,
    bbox: Rect,
}

struct Negotiated {
    inputs: SmallVec<[(&'static str, Format); 2]>,
    output: Format,
    bbox: Rect,
    warnings: Vec<PixgraphError>,
}

impl Engine {
    /// Negotiate formats and bounding boxes for every node, producers first, and drop retained
    /// outputs of nodes edited since the last prepare (and everything downstream of them).
    ///
    /// Fails with a graph error when the graph has a cycle.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = graph.len()))]
    pub fn prepare(&self, graph: &mut Graph) -> PixgraphResult<PrepareReport> {
        let order = graph.topo_order()?;
        let dirty = graph.take_dirty();
        for id in &dirty {
            self.store().invalidate(*id);
        }

        let mut report = PrepareReport {
            order: order.clone(),
            invalidated: dirty.into_iter().collect(),
            warnings: Vec::new(),
        };
        for id in order {
            let negotiated = self.negotiate(graph, id)?;
            for error in negotiated.warnings {
                tracing::warn!(node = id.0, %error, "prepare");
                report.warnings.push(NodeWarning { node: id, error });
            }
            let node = graph.node_mut(id)?;
            for (pad, format) in negotiated.inputs {
                node.bind_format(pad, format);
            }
            node.bind_format(OUTPUT_PAD, negotiated.output);
            node.set_bounding_box(negotiated.bbox);
        }
        Ok(report)
    }

    fn negotiate(&self, graph: &Graph, id: NodeId) -> PixgraphResult<Negotiated> {
        let node = graph.node(id)?;
        let mut upstream: SmallVec<[Option<Upstream>; 2]> = SmallVec::new();
        for pad in node.input_pads() {
            upstream.push(match pad.producer() {
                Some(p) => {
                    let producer = graph.node(p)?;
                    let format = producer.output_format().cloned().ok_or_else(|| {
                        PixgraphError::graph(format!("node {} prepared before its producer", id.0))
                    })?;
                    Some(Upstream {
                        format,
                        bbox: producer.bounding_box(),
                    })
                }
                None => None,
            });
        }
        let input = upstream.first().cloned().flatten();

        Ok(match node.op() {
            Operation::Shift(_) => {
                let format = match &input {
                    Some(up) => up.format.clone(),
                    None => self.canonical(SampleEncoding::RgbaFloat),
                };
                Negotiated {
                    inputs: SmallVec::from_iter([(INPUT_PAD, format.clone())]),
                    output: format,
                    bbox: area_filter::bounding_box(input.map(|up| up.bbox)),
                    warnings: Vec::new(),
                }
            }
            Operation::CastSpace(op) => {
                let aux = upstream.get(1).cloned().flatten();
                let formats = op.negotiate(
                    self.colors(),
                    input.as_ref().map(|up| &up.format),
                    aux.as_ref().map(|up| &up.format),
                );
                Negotiated {
                    inputs: SmallVec::from_iter([
                        (INPUT_PAD, formats.input),
                        (AUX_PAD, formats.aux),
                    ]),
                    output: formats.output,
                    bbox: composer::bounding_box(
                        upstream.iter().map(|up| up.as_ref().map(|u| u.bbox)),
                    ),
                    warnings: formats.warnings,
                }
            }
            Operation::LinearSinusoid(op) => Negotiated {
                inputs: SmallVec::new(),
                output: self.canonical(SampleEncoding::YFloat),
                bbox: op.bounding_box(),
                warnings: Vec::new(),
            },
            Operation::BufferSource(op) => Negotiated {
                inputs: SmallVec::new(),
                output: op.format().clone(),
                bbox: op.bounding_box(),
                warnings: Vec::new(),
            },
        })
    }

    fn canonical(&self, encoding: SampleEncoding) -> Format {
        let colors = self.colors();
        colors.resolve(encoding.name()).unwrap_or_else(|| {
            Format::new(encoding, colors.space(DEFAULT_SPACE))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/prepare.rs"]
mod tests;
